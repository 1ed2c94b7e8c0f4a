// src/api/mod.rs — HTTP surface: chat API, pages, and PWA assets

pub mod cookies;
pub mod handlers;
pub mod pages;
pub mod types;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::{MessageRouter, SessionStore};
use crate::infra::config::Config;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<SessionStore>,
    pub router: Arc<MessageRouter>,
    pub static_dir: PathBuf,
    pub manifest: PathBuf,
    pub cors_origins: Vec<HeaderValue>,
}

impl ApiState {
    pub fn new(config: &Config, store: Arc<SessionStore>, router: Arc<MessageRouter>) -> Self {
        Self {
            store,
            router,
            static_dir: PathBuf::from(&config.server.static_dir),
            manifest: PathBuf::from(&config.server.manifest),
            cors_origins: config
                .server
                .cors_origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect(),
        }
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: ApiState) -> Router {
    let router: Router<ApiState> = Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/hello", get(handlers::hello))
        .route("/ping", get(handlers::ping))
        .route("/", get(handlers::home))
        .route("/dashboard", get(handlers::dashboard))
        .route("/chat", get(handlers::chat_page))
        .route("/manifest.webmanifest", get(handlers::manifest))
        .route("/static/{file}", get(handlers::static_file));

    // Same-origin only unless origins are configured.
    let router = if state.cors_origins.is_empty() {
        router
    } else {
        router.layer(
            CorsLayer::new()
                .allow_origin(state.cors_origins.clone())
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the server and run until Ctrl-C.
pub async fn start_server(config: &Config, state: ApiState) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let router = build_router(state);

    tracing::info!("Parable listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutting down");
            }
        })
        .await?;
    Ok(())
}
