//! Repository for the `user_roles` table.

use backoffice_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::user_role::UserRole;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, is_default, created_at, updated_at";

/// Provides read operations and default-flag updates for user roles.
pub struct UserRoleRepo;

impl UserRoleRepo {
    /// Find a role by its internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<UserRole>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_roles WHERE id = $1");
        sqlx::query_as::<_, UserRole>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the role currently flagged default, if any.
    pub async fn find_default<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<UserRole>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_roles WHERE is_default");
        sqlx::query_as::<_, UserRole>(&query)
            .fetch_optional(executor)
            .await
    }

    /// Clear the default flag on every role that carries it.
    ///
    /// Returns the number of rows changed.
    pub async fn clear_default<'e>(executor: impl PgExecutor<'e>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE user_roles SET is_default = false WHERE is_default")
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Flag a role as the default. Returns `false` if the role does not exist.
    ///
    /// The partial unique index on `is_default` rejects this unless the
    /// previous default was cleared first.
    pub async fn set_default<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE user_roles SET is_default = true WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
