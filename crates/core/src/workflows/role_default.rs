//! Switch which user role is the default.
//!
//! Clearing the old default, setting the new one and writing the audit entry
//! happen in one transaction, so at any committed point exactly one role is
//! flagged default.

use crate::audit::{entity_types, NewLogEntry};
use crate::error::CoreError;
use crate::store::{AdminStore, AdminTransaction};
use crate::types::{Actor, DbId};

/// Audit description for a default-role switch.
pub const ROLE_SET_DEFAULT_DESCRIPTION: &str = "User role set default.";

/// Acknowledgement returned to the client.
pub const ROLE_SET_DEFAULT_MESSAGE: &str = "Role successfully set as the default.";

/// Make `raw_role_id` the default role on behalf of `actor`.
///
/// `raw_role_id` is the identifier as it arrived in the request path.
pub async fn set_default_role<S: AdminStore>(
    store: &S,
    actor: Option<&Actor>,
    client_ip: &str,
    raw_role_id: &str,
) -> Result<DbId, CoreError> {
    let actor = actor.ok_or_else(CoreError::unauthorized)?;
    let role_id = parse_role_id(raw_role_id)?;

    store
        .find_role(role_id)
        .await?
        .ok_or_else(|| role_not_found(role_id))?;

    let mut tx = store.begin().await?;
    tx.lock_role_defaults().await?;

    let cleared = tx.clear_default_roles().await?;
    if !tx.mark_role_default(role_id).await? {
        // Deleted between the existence check and the lock.
        return Err(role_not_found(role_id));
    }

    tx.append_log(&NewLogEntry::update(
        actor,
        entity_types::USER_ROLE,
        role_id,
        ROLE_SET_DEFAULT_DESCRIPTION,
        client_ip,
    ))
    .await?;
    tx.commit().await?;

    tracing::info!(
        user_id = actor.user_id,
        role = %actor.role,
        role_id,
        cleared,
        "Default user role switched"
    );

    Ok(role_id)
}

fn parse_role_id(raw: &str) -> Result<DbId, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::Validation("Role ID is required.".to_string()));
    }
    raw.parse::<DbId>()
        .map_err(|_| CoreError::Validation(format!("Invalid role ID '{raw}'.")))
}

fn role_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Role", id }
}
