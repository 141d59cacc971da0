// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    handlers::{health, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * `/api/quiz/*` grades uploads and exposes the criteria table.
/// * Everything else is served from the static directory (the upload page).
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route(
            "/upload",
            post(quiz::upload_quiz).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/criteria", get(quiz::list_criteria));

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .route("/api/health", get(health::health))
        .fallback_service(static_files)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Config {
            static_dir: "does-not-exist".to_string(),
            ..Config::default()
        };
        create_router(AppState::from_config(config).unwrap())
    }

    #[tokio::test]
    async fn health_reports_strategy() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn upload_requires_multipart() {
        let response = app()
            .oneshot(
                Request::post("/api/quiz/upload")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
