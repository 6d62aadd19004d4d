use axum::routing::patch;
use axum::Router;

use crate::handlers::roles;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/roles/{id}/default", patch(roles::set_default))
}
