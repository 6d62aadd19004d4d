//! Handler for switching the default user role.

use axum::extract::{Path, State};
use axum::Json;
use backoffice_core::types::Actor;
use backoffice_core::workflows::role_default::{set_default_role, ROLE_SET_DEFAULT_MESSAGE};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::response::MessageResponse;
use crate::state::AppState;

/// PATCH /api/v1/roles/{id}/default
///
/// The id is taken raw so that a non-numeric value surfaces as a validation
/// error rather than a path rejection.
pub async fn set_default(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    ClientIp(client_ip): ClientIp,
    Path(role_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let actor = user.map(Actor::from);

    set_default_role(&state.store, actor.as_ref(), &client_ip, &role_id).await?;

    Ok(Json(MessageResponse {
        message: ROLE_SET_DEFAULT_MESSAGE,
    }))
}
