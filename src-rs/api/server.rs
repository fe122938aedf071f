use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{handle_chat, handle_health, AppState};
use crate::chat::ChatService;
use crate::config::ServerConfig;

/// Routes: the landing page at `/`, `POST /api/chat` and `GET /health`.
pub fn router(state: Arc<AppState>, public_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .route("/api/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ChatServer {
    pub port: u16,
    pub public_dir: PathBuf,
    pub state: Arc<AppState>,
}

impl ChatServer {
    pub fn new(cfg: &ServerConfig, service: ChatService) -> Self {
        Self {
            port: cfg.port,
            public_dir: cfg.public_dir.clone(),
            state: Arc::new(AppState::new(service)),
        }
    }

    pub async fn start(&self) -> Result<(), String> {
        let app = router(self.state.clone(), &self.public_dir);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(port = self.port, "server listening");
        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| err.to_string())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
