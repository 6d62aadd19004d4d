//! Audit log model.
//!
//! Rows are append-only; there is no `updated_at` column.

use backoffice_core::audit::ActivityLogEntry;
use backoffice_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `system_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemLog {
    pub id: DbId,
    pub event: String,
    pub user_id: DbId,
    pub entity_id: String,
    pub entity_type: String,
    pub description: String,
    pub ip_address: String,
    pub created_at: Timestamp,
}

impl From<SystemLog> for ActivityLogEntry {
    fn from(row: SystemLog) -> Self {
        ActivityLogEntry {
            id: row.id,
            event: row.event,
            entity_id: row.entity_id,
            entity_type: row.entity_type,
            description: row.description,
            ip_address: row.ip_address,
            created_at: row.created_at,
        }
    }
}
