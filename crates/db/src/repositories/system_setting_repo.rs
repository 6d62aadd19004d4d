//! Repository for the `system_settings` singleton table.

use backoffice_core::settings::ValidatedSettings;
use backoffice_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::system_setting::SystemSetting;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, active, address, website_url, support_email, support_phone, \
    language, timezone, currency, currency_format, default_user_role_id, \
    logo, created_at, updated_at";

/// Provides read and update operations for the settings row.
pub struct SystemSettingRepo;

impl SystemSettingRepo {
    /// Find the settings row by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<SystemSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings WHERE id = $1");
        sqlx::query_as::<_, SystemSetting>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the settings row and hold a row lock on it until the surrounding
    /// transaction ends.
    pub async fn find_by_id_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<SystemSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, SystemSetting>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite every editable column, including the logo reference.
    ///
    /// Returns `None` if the row does not exist.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        settings: &ValidatedSettings,
        logo: Option<&str>,
    ) -> Result<Option<SystemSetting>, sqlx::Error> {
        let query = format!(
            "UPDATE system_settings SET \
                name = $2, \
                active = $3, \
                address = $4, \
                website_url = $5, \
                support_email = $6, \
                support_phone = $7, \
                language = $8, \
                timezone = $9, \
                currency = $10, \
                currency_format = $11, \
                default_user_role_id = $12, \
                logo = $13 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemSetting>(&query)
            .bind(id)
            .bind(&settings.name)
            .bind(settings.active)
            .bind(&settings.address)
            .bind(&settings.website_url)
            .bind(&settings.support_email)
            .bind(&settings.support_phone)
            .bind(&settings.language)
            .bind(&settings.timezone)
            .bind(&settings.currency)
            .bind(&settings.currency_format)
            .bind(settings.default_user_role_id)
            .bind(logo)
            .fetch_optional(executor)
            .await
    }
}
