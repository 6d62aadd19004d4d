//! Persistence seam used by the workflows.
//!
//! [`AdminStore`] offers the non-transactional reads and opens units of work.
//! An [`AdminTransaction`] either commits every write made through it, audit
//! entries included, or none of them: dropping it without calling
//! [`AdminTransaction::commit`] rolls everything back.

use async_trait::async_trait;

use crate::activity::{ActivityLogFilter, ActivityLogSlice};
use crate::audit::NewLogEntry;
use crate::error::CoreError;
use crate::settings::ValidatedSettings;
use crate::types::DbId;

/// The parts of the settings row the workflows reason about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    pub id: DbId,
    /// Object-store key of the current logo.
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub id: DbId,
    pub name: String,
    pub is_default: bool,
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    type Tx: AdminTransaction;

    /// Open a new unit of work.
    async fn begin(&self) -> Result<Self::Tx, CoreError>;

    async fn find_settings(&self, id: DbId) -> Result<Option<SettingsRecord>, CoreError>;

    async fn find_role(&self, id: DbId) -> Result<Option<RoleRecord>, CoreError>;

    /// Entries owned by `user_id` that match `filter`, one page at a time.
    async fn list_activity(
        &self,
        user_id: DbId,
        filter: &ActivityLogFilter,
    ) -> Result<ActivityLogSlice, CoreError>;
}

#[async_trait]
pub trait AdminTransaction: Send {
    /// Read the settings row and hold it against concurrent writers until the
    /// transaction ends.
    async fn lock_settings(&mut self, id: DbId) -> Result<Option<SettingsRecord>, CoreError>;

    /// Overwrite every settings field and the logo reference.
    async fn update_settings(
        &mut self,
        id: DbId,
        settings: &ValidatedSettings,
        logo: Option<&str>,
    ) -> Result<(), CoreError>;

    /// Serialize default-role switches for the rest of the transaction.
    async fn lock_role_defaults(&mut self) -> Result<(), CoreError>;

    /// Clear the default flag on every role that has it. Returns the number of
    /// roles touched.
    async fn clear_default_roles(&mut self) -> Result<u64, CoreError>;

    /// Flag one role as default. Returns `false` if the role no longer exists.
    async fn mark_role_default(&mut self, id: DbId) -> Result<bool, CoreError>;

    /// Append an audit entry as part of this transaction.
    async fn append_log(&mut self, entry: &NewLogEntry) -> Result<(), CoreError>;

    async fn commit(self) -> Result<(), CoreError>;
}
