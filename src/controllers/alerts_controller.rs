use axum::{
    extract::{Form, Path, State},
    response::Response,
};
use serde::Deserialize;

use crate::{
    controllers::reply_response,
    error::CommandError,
    models::{AlertAction, BotReply},
    services::{alerts_service, commands},
    AppState,
};

#[derive(Deserialize)]
pub struct AlertForm {
    pub symbol: String,
    // kept as text so a bad number becomes a readable error, not a 400
    pub threshold: String,
    pub action: String,
}

impl AlertForm {
    fn parse(&self) -> Result<(String, f64, AlertAction), CommandError> {
        let symbol = commands::parse_symbol(&self.symbol)?;
        let threshold = commands::parse_threshold(&self.threshold)?;
        let action = self.action.parse::<AlertAction>()?;
        Ok((symbol, threshold, action))
    }
}

// POST /alerts/:user_id
pub async fn post_create_alert(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Form(form): Form<AlertForm>,
) -> Response {
    let res = match form.parse() {
        Ok((symbol, threshold, action)) => {
            alerts_service::register_alert(&state, user_id, &symbol, threshold, action).await
        }
        Err(e) => Err(e),
    };
    reply_response(res)
}

// GET /alerts/:user_id
pub async fn get_alerts(State(state): State<AppState>, Path(user_id): Path<u64>) -> Response {
    reply_response(alerts_service::list_alerts(&state, user_id).await)
}

// POST /alerts/:user_id/remove
pub async fn post_remove_alert(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Form(form): Form<AlertForm>,
) -> Response {
    let res = match form.parse() {
        Ok((symbol, threshold, action)) => {
            alerts_service::remove_alert(&state, user_id, &symbol, threshold, action).await
        }
        Err(e) => Err(e),
    };
    reply_response(res)
}

// POST /alerts/:user_id/:id/delete
pub async fn post_delete_alert(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(u64, String)>,
) -> Response {
    reply_response(alerts_service::remove_alert_by_id(&state, user_id, &id).await)
}

// POST /alerts/:user_id/dismiss
pub async fn post_dismiss(State(state): State<AppState>, Path(_user_id): Path<u64>) -> Response {
    reply_response(Ok::<BotReply, CommandError>(alerts_service::dismiss(&state)))
}
