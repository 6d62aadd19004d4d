//! General settings update.
//!
//! Validates the submitted form, reconciles the logo with the object store and
//! writes the settings row plus its audit entry in one transaction.
//!
//! The object store cannot take part in the transaction, so ordering carries
//! the consistency guarantee instead:
//!
//! - a new logo is uploaded *before* the transaction opens, and deleted again
//!   if the row does not end up referencing it;
//! - a removed logo is deleted only *after* the commit.
//!
//! When the commit itself reports an error its outcome is unknown, so the row
//! is read back before an uploaded object is released. The stored logo
//! reference therefore never points at a deleted object.

use crate::audit::{entity_types, NewLogEntry};
use crate::error::CoreError;
use crate::settings::{
    validate_settings_form, LogoAction, LogoUpload, RawSettingsForm, SettingsSubmission,
    SETTINGS_SINGLETON_ID,
};
use crate::storage::{release_object, ObjectStore, LOGO_PREFIX};
use crate::store::{AdminStore, AdminTransaction};
use crate::types::Actor;

/// Message returned when the form fails validation.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Please check your data and try again.";

/// Message returned when the logo could not be stored.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload logo.";

/// Audit description for a settings update.
pub const SETTINGS_UPDATED_DESCRIPTION: &str = "System settings updated.";

/// Acknowledgement returned to the client.
pub const SETTINGS_UPDATED_MESSAGE: &str = "Settings updated successfully";

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsUpdated {
    /// Logo reference now stored on the settings row.
    pub logo: Option<String>,
}

/// What the transaction wrote.
#[derive(Debug)]
struct Written {
    logo: Option<String>,
    /// Object no longer referenced; deleted once the commit is confirmed.
    stale: Option<String>,
}

/// Where a write attempt failed.
#[derive(Debug)]
enum WriteFailure {
    /// Rolled back before `commit` was issued.
    RolledBack(CoreError),
    /// `commit` returned an error; the row may or may not have changed.
    CommitUnconfirmed(CoreError),
}

/// Run the settings update on behalf of `actor`.
pub async fn update_settings<S: AdminStore>(
    store: &S,
    objects: &dyn ObjectStore,
    actor: Option<&Actor>,
    client_ip: &str,
    form: RawSettingsForm,
) -> Result<SettingsUpdated, CoreError> {
    let actor = actor.ok_or_else(CoreError::unauthorized)?;

    store
        .find_settings(SETTINGS_SINGLETON_ID)
        .await?
        .ok_or_else(settings_not_found)?;

    let submission = validate_settings_form(form).map_err(|e| {
        tracing::debug!(user_id = actor.user_id, fields = ?e.fields, "Settings form rejected");
        CoreError::Validation(INVALID_INPUT_MESSAGE.to_string())
    })?;

    // Uploaded outside the transaction; no row lock is held during the PUT.
    let uploaded = match (submission.logo_action, submission.logo_file.as_ref()) {
        (Some(LogoAction::Save), Some(file)) => Some(upload_logo(objects, actor, file).await?),
        _ => None,
    };

    let entry = NewLogEntry::update(
        actor,
        entity_types::SYSTEM_SETTINGS,
        actor.user_id,
        SETTINGS_UPDATED_DESCRIPTION,
        client_ip,
    );

    let written = match write_settings(store, &submission, uploaded.as_deref(), &entry).await {
        Ok(written) => written,
        Err(WriteFailure::RolledBack(err)) => {
            if let Some(key) = uploaded.as_deref() {
                let _ = release_object(objects, key, "settings update rolled back").await;
            }
            return Err(err);
        }
        Err(WriteFailure::CommitUnconfirmed(err)) => {
            if let Some(key) = uploaded.as_deref() {
                release_if_unreferenced(store, objects, key).await;
            }
            return Err(err);
        }
    };

    if let Some(key) = written.stale.as_deref() {
        let _ = release_object(objects, key, "logo removed").await;
    }

    tracing::info!(
        user_id = actor.user_id,
        role = %actor.role,
        logo = ?written.logo,
        "System settings updated"
    );

    Ok(SettingsUpdated { logo: written.logo })
}

async fn upload_logo(
    objects: &dyn ObjectStore,
    actor: &Actor,
    file: &LogoUpload,
) -> Result<String, CoreError> {
    objects.upload(file, LOGO_PREFIX).await.map_err(|e| {
        tracing::error!(user_id = actor.user_id, error = %e, "Logo upload failed");
        CoreError::UploadFailed(UPLOAD_FAILED_MESSAGE.to_string())
    })
}

/// Lock the row, write it and its audit entry, then commit.
///
/// Any early return drops the transaction, which rolls it back.
async fn write_settings<S: AdminStore>(
    store: &S,
    submission: &SettingsSubmission,
    uploaded: Option<&str>,
    entry: &NewLogEntry,
) -> Result<Written, WriteFailure> {
    let mut tx = store.begin().await.map_err(WriteFailure::RolledBack)?;

    // Authoritative read: the row stays locked until commit or rollback.
    let current = tx
        .lock_settings(SETTINGS_SINGLETON_ID)
        .await
        .map_err(WriteFailure::RolledBack)?
        .ok_or_else(|| WriteFailure::RolledBack(settings_not_found()))?;

    let written = match (submission.logo_action, uploaded) {
        (Some(LogoAction::Remove), _) => Written {
            logo: None,
            stale: current.logo,
        },
        (_, Some(key)) => Written {
            logo: Some(key.to_string()),
            stale: None,
        },
        _ => Written {
            logo: current.logo,
            stale: None,
        },
    };

    tx.update_settings(current.id, &submission.settings, written.logo.as_deref())
        .await
        .map_err(WriteFailure::RolledBack)?;
    tx.append_log(entry).await.map_err(WriteFailure::RolledBack)?;
    tx.commit().await.map_err(WriteFailure::CommitUnconfirmed)?;

    Ok(written)
}

/// Release `key` unless the settings row turned out to reference it. An
/// unreadable row keeps the object.
async fn release_if_unreferenced<S: AdminStore>(store: &S, objects: &dyn ObjectStore, key: &str) {
    match store.find_settings(SETTINGS_SINGLETON_ID).await {
        Ok(Some(row)) if row.logo.as_deref() == Some(key) => {
            tracing::warn!(key, "Commit reported an error but the logo was stored; keeping it");
        }
        Ok(_) => {
            let _ = release_object(objects, key, "settings update not committed").await;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Could not confirm commit; keeping uploaded logo");
        }
    }
}

fn settings_not_found() -> CoreError {
    CoreError::NotFound {
        entity: "SystemSettings",
        id: SETTINGS_SINGLETON_ID,
    }
}
