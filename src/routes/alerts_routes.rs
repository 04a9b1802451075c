use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::alerts_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/alerts/:user_id",
            get(alerts_controller::get_alerts).post(alerts_controller::post_create_alert),
        )
        .route("/alerts/:user_id/remove", post(alerts_controller::post_remove_alert))
        .route("/alerts/:user_id/dismiss", post(alerts_controller::post_dismiss))
        .route("/alerts/:user_id/:id/delete", post(alerts_controller::post_delete_alert))
}
