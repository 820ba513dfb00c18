use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::BotReply;
use crate::services::conversation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(
        rename = "sessionId",
        alias = "session_id",
        default = "default_session"
    )]
    pub session_id: String,
}

fn default_session() -> String {
    "default".to_string()
}

// POST /api/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<BotReply>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::EmptyMessage);
    }

    let reply = conversation::process_message(&state, &req.session_id, message)?;
    Ok(Json(reply))
}
