//! User role model.

use backoffice_core::store::RoleRecord;
use backoffice_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRole {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UserRole> for RoleRecord {
    fn from(row: UserRole) -> Self {
        RoleRecord {
            id: row.id,
            name: row.name,
            is_default: row.is_default,
        }
    }
}
