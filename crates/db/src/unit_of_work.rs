//! PostgreSQL implementation of the workflow store.
//!
//! [`PgAdminTransaction`] wraps a `sqlx::Transaction`. Dropping it without
//! calling `commit` rolls back, which is how every early return in a workflow
//! undoes its partial writes.

use async_trait::async_trait;
use backoffice_core::activity::{ActivityLogFilter, ActivityLogSlice};
use backoffice_core::audit::NewLogEntry;
use backoffice_core::error::CoreError;
use backoffice_core::settings::ValidatedSettings;
use backoffice_core::store::{AdminStore, AdminTransaction, RoleRecord, SettingsRecord};
use backoffice_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::map_sqlx_error;
use crate::repositories::{SystemLogRepo, SystemSettingRepo, UserRoleRepo};

/// Advisory lock key serializing default-role switches across connections.
const ROLE_DEFAULT_LOCK_KEY: i64 = 0x7573_6572_726f_6c65;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Store backed by a connection pool.
#[derive(Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    type Tx = PgAdminTransaction;

    async fn begin(&self) -> Result<PgAdminTransaction, CoreError> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(PgAdminTransaction { tx })
    }

    async fn find_settings(&self, id: DbId) -> Result<Option<SettingsRecord>, CoreError> {
        SystemSettingRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(SettingsRecord::from))
            .map_err(map_sqlx_error)
    }

    async fn find_role(&self, id: DbId) -> Result<Option<RoleRecord>, CoreError> {
        UserRoleRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(RoleRecord::from))
            .map_err(map_sqlx_error)
    }

    async fn list_activity(
        &self,
        user_id: DbId,
        filter: &ActivityLogFilter,
    ) -> Result<ActivityLogSlice, CoreError> {
        let rows = SystemLogRepo::list_for_user(&self.pool, user_id, filter)
            .await
            .map_err(map_sqlx_error)?;
        let total = SystemLogRepo::count_for_user(&self.pool, user_id, filter)
            .await
            .map_err(map_sqlx_error)?;

        Ok(ActivityLogSlice {
            entries: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// One unit of work on a single pooled connection.
pub struct PgAdminTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl AdminTransaction for PgAdminTransaction {
    async fn lock_settings(&mut self, id: DbId) -> Result<Option<SettingsRecord>, CoreError> {
        SystemSettingRepo::find_by_id_for_update(&mut *self.tx, id)
            .await
            .map(|row| row.map(SettingsRecord::from))
            .map_err(map_sqlx_error)
    }

    async fn update_settings(
        &mut self,
        id: DbId,
        settings: &ValidatedSettings,
        logo: Option<&str>,
    ) -> Result<(), CoreError> {
        SystemSettingRepo::update(&mut *self.tx, id, settings, logo)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(CoreError::NotFound {
                entity: "SystemSettings",
                id,
            })
            .map(|_| ())
    }

    async fn lock_role_defaults(&mut self) -> Result<(), CoreError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ROLE_DEFAULT_LOCK_KEY)
            .execute(&mut *self.tx)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }

    async fn clear_default_roles(&mut self) -> Result<u64, CoreError> {
        UserRoleRepo::clear_default(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }

    async fn mark_role_default(&mut self, id: DbId) -> Result<bool, CoreError> {
        UserRoleRepo::set_default(&mut *self.tx, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn append_log(&mut self, entry: &NewLogEntry) -> Result<(), CoreError> {
        SystemLogRepo::insert(&mut *self.tx, entry)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }

    async fn commit(self) -> Result<(), CoreError> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }
}
