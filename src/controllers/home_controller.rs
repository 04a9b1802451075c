use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::{services::alerts_service, AppState};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, alerts_service::ping(&state).content)
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}
