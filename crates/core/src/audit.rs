//! Audit log vocabulary and entry types.
//!
//! Entries are append-only: this module only describes what gets written.
//! Persisting an entry is the job of [`crate::store::AdminTransaction::append_log`],
//! which keeps the write inside the caller's transaction.

use serde::Serialize;

use crate::types::{Actor, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Event constants
// ---------------------------------------------------------------------------

/// Known event tags for audit log entries.
pub mod events {
    pub const UPDATE: &str = "update";
}

/// Entity type tags, namespaced by area.
pub mod entity_types {
    pub const SYSTEM_SETTINGS: &str = "system.settings";
    pub const USER_ROLE: &str = "user.role";
}

// ---------------------------------------------------------------------------
// Write side
// ---------------------------------------------------------------------------

/// An audit entry waiting to be appended.
///
/// `created_at` is assigned by the store at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub event: String,
    pub user_id: DbId,
    pub entity_id: String,
    pub entity_type: String,
    pub description: String,
    pub ip_address: String,
}

impl NewLogEntry {
    /// Build an `update` entry attributed to `actor`.
    pub fn update(
        actor: &Actor,
        entity_type: &str,
        entity_id: impl ToString,
        description: &str,
        ip_address: &str,
    ) -> Self {
        Self {
            event: events::UPDATE.to_string(),
            user_id: actor.user_id,
            entity_id: entity_id.to_string(),
            entity_type: entity_type.to_string(),
            description: description.to_string(),
            ip_address: ip_address.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Read side
// ---------------------------------------------------------------------------

/// One row of the activity log as shown to its owner.
///
/// Omits the owning `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: DbId,
    pub event: String,
    pub entity_id: String,
    pub entity_type: String,
    pub description: String,
    pub ip_address: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
