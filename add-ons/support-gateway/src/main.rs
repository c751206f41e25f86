//! Axum-based support gateway: chat page and JSON API over the fuzzy FAQ responder.
//! Config-driven via CoreConfig.

mod handlers;
mod sessions;

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use sessions::SessionStore;
use std::sync::Arc;
use support_core::{CoreConfig, Responder};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pre-flight check: config loads, knowledge base and scorer resolve, port is available.
fn run_verify() -> Result<(), String> {
    print!("Checking config... ");
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;
    println!("OK");
    verify_config(&config)?;
    println!("\nSUCCESS: ready to start gateway.");
    Ok(())
}

fn verify_config(config: &CoreConfig) -> Result<(), String> {
    print!("Checking knowledge base and scorer... ");
    let responder = config
        .build_responder()
        .map_err(|e| format!("Responder setup failed: {}", e))?;
    println!(
        "OK ({} entries, scorer {}, threshold {})",
        responder.knowledge().len(),
        responder.matcher().scorer_name(),
        responder.matcher().threshold()
    );

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[support-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match CoreConfig::load() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config");
            std::process::exit(1);
        }
    };
    let responder = match config.build_responder() {
        Ok(responder) => Arc::new(responder),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build responder");
            std::process::exit(1);
        }
    };

    let app = build_app(AppState {
        sessions: Arc::new(SessionStore::new(config.history_limit, config.max_sessions)),
        config: Arc::clone(&config),
        responder,
    });

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("{} listening on {}", config.app_name, addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::chat::index))
        .route("/ask", post(handlers::chat::ask_form))
        .route("/api/v1/ask", post(handlers::chat::ask_json))
        .route("/api/v1/history/:session_id", get(handlers::chat::history))
        .route("/api/v1/health", get(health))
        .route("/api/v1/status", get(status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) responder: Arc<Responder>,
    pub(crate) sessions: Arc<SessionStore>,
}

/// GET /api/v1/health – liveness check.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/v1/status – identity and matching policy.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "scorer": state.responder.matcher().scorer_name(),
        "threshold": state.responder.matcher().threshold(),
        "entries": state.responder.knowledge().len(),
        "history_limit": state.config.history_limit,
        "active_sessions": state.sessions.len(),
        "max_sessions": state.sessions.max_sessions(),
    }))
}
