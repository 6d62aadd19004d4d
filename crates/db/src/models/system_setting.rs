//! System settings singleton model.

use backoffice_core::store::SettingsRecord;
use backoffice_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// The single row of the `system_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemSetting {
    pub id: DbId,
    pub name: String,
    pub active: bool,
    pub address: Option<String>,
    pub website_url: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
    pub currency_format: Option<String>,
    pub default_user_role_id: Option<DbId>,
    /// Object-store key of the current logo.
    pub logo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<SystemSetting> for SettingsRecord {
    fn from(row: SystemSetting) -> Self {
        SettingsRecord {
            id: row.id,
            logo: row.logo,
        }
    }
}
