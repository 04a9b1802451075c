use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::{error::CommandError, models::BotReply};

pub mod home_controller;
pub mod alerts_controller;
pub mod commands_controller;

/// Bad input is the user's to fix (422), a failing store is ours (500).
/// Both still carry a message the chat gateway can relay as is.
pub fn reply_response(res: Result<BotReply, CommandError>) -> Response {
    match res {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) if e.is_validation() => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BotReply::error(e.to_string())),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("command failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BotReply::error(e.to_string())),
            )
                .into_response()
        }
    }
}
