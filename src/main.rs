// src/main.rs

use dotenvy::dotenv;
use quiz_grader::config::Config;
use quiz_grader::routes;
use quiz_grader::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::info!("Grading strategy: {}", config.strategy);

    // Build criteria table and scorer
    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config).unwrap_or_else(|e| {
        tracing::error!("Failed to initialise grader: {}", e);
        std::process::exit(1);
    });
    tracing::info!("{} questions have grading criteria", state.criteria.len());

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", bind_addr, e));
    tracing::info!("Listening on {}", bind_addr);

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
