use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::chat::ChatService;
use crate::error::ChatError;
use crate::result::ChatReply;

/// Input used when a request carries no usable text.
pub const DEFAULT_INPUT: &str = "Hello!";

pub struct AppState {
    pub service: ChatService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: ChatService) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub input: Option<String>,
}

impl ChatRequest {
    pub fn input_or_default(&self) -> String {
        match self.input.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => DEFAULT_INPUT.to_string(),
        }
    }
}

pub async fn handle_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = Utc::now().signed_duration_since(state.started_at);
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime.num_seconds(),
    }))
}

/// `POST /api/chat`. A body sent without a JSON content type is treated like
/// an empty input; a JSON body that fails to parse is rejected before any
/// model call.
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatReply>) {
    let request = match body {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => ChatRequest::default(),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected chat body");
            return (StatusCode::BAD_REQUEST, Json(ChatReply::new(rejection.body_text())));
        }
    };
    let input = request.input_or_default();

    let result = tokio::task::spawn_blocking(move || state.service.respond(&input))
        .await
        .map_err(|err| ChatError::Worker(err.to_string()))
        .and_then(|result| result);

    match result {
        Ok(reply) => (StatusCode::OK, Json(reply)),
        Err(err) => {
            error!(error = %err, "chat request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ChatReply::server_error()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_when_missing_or_empty() {
        assert_eq!(ChatRequest::default().input_or_default(), DEFAULT_INPUT);
        let empty = ChatRequest {
            input: Some(String::new()),
        };
        assert_eq!(empty.input_or_default(), DEFAULT_INPUT);
    }

    #[test]
    fn whitespace_input_is_kept() {
        let req = ChatRequest {
            input: Some("  ".to_string()),
        };
        assert_eq!(req.input_or_default(), "  ");
    }
}
