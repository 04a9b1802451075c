use axum::{Router, routing::post};
use crate::{AppState, controllers::commands_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/commands", post(commands_controller::post_command))
}
