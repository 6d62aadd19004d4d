//! Handler for the current user's activity log.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use backoffice_core::activity::{ActivityLogPage, ActivityLogParams};
use backoffice_core::types::Actor;
use backoffice_core::workflows::activity_logs::list_activity_logs;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/activity-logs
///
/// Query: `page, limit, query, sort, dir, createdAtFrom, createdAtTo`.
pub async fn list(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    params: Result<Query<ActivityLogParams>, QueryRejection>,
) -> AppResult<Json<ActivityLogPage>> {
    let actor = user.map(Actor::from);
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let page = list_activity_logs(&state.store, actor.as_ref(), &params).await?;

    Ok(Json(page))
}
