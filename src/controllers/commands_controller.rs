use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};

use crate::{
    controllers::reply_response,
    services::{alerts_service, commands},
    AppState,
};

/// A chat message forwarded by the gateway bridge.
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "user_id_from_number_or_string")]
    pub user_id: u64,
    pub content: String,
}

// Discord sends snowflakes as strings; plain numbers are accepted too.
fn user_id_from_number_or_string<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Raw::deserialize(de)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// POST /commands
pub async fn post_command(State(state): State<AppState>, Json(msg): Json<ChatMessage>) -> Response {
    let cmd = match commands::parse(&state.settings.command_prefix, &msg.content) {
        Ok(Some(cmd)) => cmd,
        Ok(None) => return StatusCode::NO_CONTENT.into_response(),
        Err(e) => return reply_response(Err(e)),
    };

    tracing::debug!(user_id = msg.user_id, ?cmd, "chat command");

    reply_response(alerts_service::handle_command(&state, msg.user_id, cmd).await)
}
