use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::config::Config;

/// Liveness probe; also reports which grading strategy is active.
pub async fn health(State(config): State<Config>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "strategy": config.strategy.to_string(),
    }))
}
