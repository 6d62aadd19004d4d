use axum::routing::get;
use axum::Router;

use crate::handlers::activity_logs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/activity-logs", get(activity_logs::list))
}
