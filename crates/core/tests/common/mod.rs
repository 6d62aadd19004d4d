//! In-memory store and object-store doubles for workflow tests.
//!
//! `MemoryStore` mirrors the transactional contract of the Postgres store: a
//! transaction holds the store lock from `begin` until it commits or is
//! dropped, works on a private copy, and publishes that copy only on commit.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use backoffice_core::activity::{
    ActivityLogFilter, ActivityLogSlice, SortDirection, SortField,
};
use backoffice_core::audit::{ActivityLogEntry, NewLogEntry};
use backoffice_core::error::CoreError;
use backoffice_core::settings::{LogoUpload, RawSettingsForm, ValidatedSettings};
use backoffice_core::storage::{object_key, ObjectStore, ObjectStoreError};
use backoffice_core::store::{AdminStore, AdminTransaction, RoleRecord, SettingsRecord};
use backoffice_core::types::{Actor, DbId, Timestamp};
use tokio::sync::{Mutex, OwnedMutexGuard};

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSettings {
    pub id: DbId,
    /// `None` until the first update.
    pub values: Option<ValidatedSettings>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLog {
    pub id: DbId,
    pub user_id: DbId,
    pub entry: ActivityLogEntry,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub settings: Option<StoredSettings>,
    pub roles: Vec<RoleRecord>,
    pub logs: Vec<StoredLog>,
    next_log_id: DbId,
}

impl MemoryState {
    fn push_log(&mut self, user_id: DbId, entry: &NewLogEntry, created_at: Timestamp) {
        self.next_log_id += 1;
        let id = self.next_log_id;
        self.logs.push(StoredLog {
            id,
            user_id,
            entry: ActivityLogEntry {
                id,
                event: entry.event.clone(),
                entity_id: entry.entity_id.clone(),
                entity_type: entry.entity_type.clone(),
                description: entry.description.clone(),
                ip_address: entry.ip_address.clone(),
                created_at,
            },
        });
    }
}

/// How `commit` misbehaves, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitFault {
    #[default]
    None,
    /// Nothing is published and an error is returned.
    Rejected,
    /// The work is published, then an error is returned anyway.
    LostAck,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_append: Arc<AtomicBool>,
    commit_fault: Arc<StdMutex<CommitFault>>,
}

impl MemoryStore {
    /// Store with a settings row carrying `logo` and the three seed roles
    /// (`admin` is the default).
    pub fn seeded(logo: Option<&str>) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.try_lock().expect("fresh store is unlocked");
            state.settings = Some(StoredSettings {
                id: 1,
                values: None,
                logo: logo.map(str::to_string),
            });
            state.roles = vec![
                RoleRecord { id: 1, name: "admin".into(), is_default: true },
                RoleRecord { id: 2, name: "editor".into(), is_default: false },
                RoleRecord { id: 3, name: "viewer".into(), is_default: false },
            ];
        }
        store
    }

    pub fn fail_log_appends(&self) {
        self.fail_append.store(true, Ordering::SeqCst);
    }

    pub fn fail_commits(&self, fault: CommitFault) {
        *self.commit_fault.lock().unwrap() = fault;
    }

    /// Whether a transaction currently holds the store.
    pub fn is_locked(&self) -> bool {
        self.state.try_lock().is_err()
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn remove_settings(&self) {
        self.state.lock().await.settings = None;
    }

    pub async fn seed_log(
        &self,
        user_id: DbId,
        event: &str,
        entity_type: &str,
        entity_id: &str,
        description: &str,
        created_at: Timestamp,
    ) {
        let entry = NewLogEntry {
            event: event.into(),
            user_id,
            entity_id: entity_id.into(),
            entity_type: entity_type.into(),
            description: description.into(),
            ip_address: "127.0.0.1".into(),
        };
        self.state.lock().await.push_log(user_id, &entry, created_at);
    }

    pub async fn default_roles(&self) -> Vec<DbId> {
        self.state
            .lock()
            .await
            .roles
            .iter()
            .filter(|r| r.is_default)
            .map(|r| r.id)
            .collect()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
    fail_append: bool,
    commit_fault: CommitFault,
}

#[async_trait]
impl AdminStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, CoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTx {
            guard,
            work,
            fail_append: self.fail_append.load(Ordering::SeqCst),
            commit_fault: *self.commit_fault.lock().unwrap(),
        })
    }

    async fn find_settings(&self, id: DbId) -> Result<Option<SettingsRecord>, CoreError> {
        let state = self.state.lock().await;
        Ok(state
            .settings
            .as_ref()
            .filter(|s| s.id == id)
            .map(|s| SettingsRecord { id: s.id, logo: s.logo.clone() }))
    }

    async fn find_role(&self, id: DbId) -> Result<Option<RoleRecord>, CoreError> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|r| r.id == id).cloned())
    }

    async fn list_activity(
        &self,
        user_id: DbId,
        filter: &ActivityLogFilter,
    ) -> Result<ActivityLogSlice, CoreError> {
        let state = self.state.lock().await;
        let needle = filter.query.as_deref().map(str::to_lowercase);

        let mut matches: Vec<ActivityLogEntry> = state
            .logs
            .iter()
            .filter(|log| log.user_id == user_id)
            .map(|log| &log.entry)
            .filter(|e| match &needle {
                None => true,
                Some(n) => [&e.event, &e.description, &e.entity_id, &e.entity_type]
                    .iter()
                    .any(|field| field.to_lowercase().contains(n.as_str())),
            })
            .filter(|e| filter.created_from.map_or(true, |from| e.created_at >= from))
            .filter(|e| filter.created_to.map_or(true, |to| e.created_at <= to))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ord = match filter.sort {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::Event => a.event.cmp(&b.event),
                SortField::EntityId => a.entity_id.cmp(&b.entity_id),
                SortField::EntityType => a.entity_type.cmp(&b.entity_type),
                SortField::Description => a.description.cmp(&b.description),
                SortField::IpAddress => a.ip_address.cmp(&b.ip_address),
            }
            .then(a.id.cmp(&b.id));
            match filter.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = matches.len() as i64;
        let entries = matches
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit as usize)
            .collect();

        Ok(ActivityLogSlice { entries, total })
    }
}

#[async_trait]
impl AdminTransaction for MemoryTx {
    async fn lock_settings(&mut self, id: DbId) -> Result<Option<SettingsRecord>, CoreError> {
        Ok(self
            .work
            .settings
            .as_ref()
            .filter(|s| s.id == id)
            .map(|s| SettingsRecord { id: s.id, logo: s.logo.clone() }))
    }

    async fn update_settings(
        &mut self,
        id: DbId,
        settings: &ValidatedSettings,
        logo: Option<&str>,
    ) -> Result<(), CoreError> {
        match self.work.settings.as_mut().filter(|s| s.id == id) {
            Some(row) => {
                row.values = Some(settings.clone());
                row.logo = logo.map(str::to_string);
                Ok(())
            }
            None => Err(CoreError::Internal("settings row vanished".into())),
        }
    }

    async fn lock_role_defaults(&mut self) -> Result<(), CoreError> {
        // The store lock is already held for the whole transaction.
        Ok(())
    }

    async fn clear_default_roles(&mut self) -> Result<u64, CoreError> {
        let mut cleared = 0;
        for role in self.work.roles.iter_mut().filter(|r| r.is_default) {
            role.is_default = false;
            cleared += 1;
        }
        Ok(cleared)
    }

    async fn mark_role_default(&mut self, id: DbId) -> Result<bool, CoreError> {
        match self.work.roles.iter_mut().find(|r| r.id == id) {
            Some(role) => {
                role.is_default = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn append_log(&mut self, entry: &NewLogEntry) -> Result<(), CoreError> {
        if self.fail_append {
            return Err(CoreError::Internal("audit sink unavailable".into()));
        }
        self.work.push_log(entry.user_id, entry, chrono::Utc::now());
        Ok(())
    }

    async fn commit(mut self) -> Result<(), CoreError> {
        match self.commit_fault {
            CommitFault::None => {
                *self.guard = std::mem::take(&mut self.work);
                Ok(())
            }
            CommitFault::Rejected => Err(CoreError::Internal("commit rejected".into())),
            CommitFault::LostAck => {
                *self.guard = std::mem::take(&mut self.work);
                Err(CoreError::Internal("connection reset after COMMIT".into()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryObjectStore {
    pub objects: StdMutex<HashMap<String, Vec<u8>>>,
    pub uploads: StdMutex<Vec<String>>,
    pub deletes: StdMutex<Vec<String>>,
    fail_upload: AtomicBool,
    fail_delete: AtomicBool,
    /// Store whose lock state is sampled on every upload.
    observed: StdMutex<Option<MemoryStore>>,
    upload_saw_lock: AtomicBool,
}

impl MemoryObjectStore {
    pub fn with_object(key: &str) -> Self {
        let store = Self::default();
        store
            .objects
            .lock()
            .unwrap()
            .insert(key.to_string(), b"old".to_vec());
        store
    }

    pub fn fail_uploads(&self) {
        self.fail_upload.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    /// Record whether `store` is locked whenever an upload runs.
    pub fn observe(&self, store: &MemoryStore) {
        *self.observed.lock().unwrap() = Some(store.clone());
    }

    pub fn upload_saw_lock(&self) -> bool {
        self.upload_saw_lock.load(Ordering::SeqCst)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, file: &LogoUpload, prefix: &str) -> Result<String, ObjectStoreError> {
        if let Some(store) = self.observed.lock().unwrap().as_ref() {
            if store.is_locked() {
                self.upload_saw_lock.store(true, Ordering::SeqCst);
            }
        }
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Backend("bucket unreachable".into()));
        }
        let key = object_key(prefix, &file.file_name);
        self.objects
            .lock()
            .unwrap()
            .insert(key.clone(), file.bytes.clone());
        self.uploads.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.deletes.lock().unwrap().push(key.to_string());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Backend("bucket unreachable".into()));
        }
        match self.objects.lock().unwrap().remove(key) {
            Some(_) => Ok(()),
            None => Err(ObjectStoreError::NotFound(key.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn actor(user_id: DbId) -> Actor {
    Actor::new(user_id, "admin")
}

pub fn settings_form(pairs: &[(&str, &str)]) -> RawSettingsForm {
    let mut fields: Vec<(&str, &str)> = vec![
        ("name", "Acme Back Office"),
        ("active", "true"),
        ("address", "1 Main Street"),
        ("websiteURL", "https://acme.example"),
        ("supportEmail", "help@acme.example"),
        ("supportPhone", "+1 555 0100"),
        ("language", "en"),
        ("timezone", "UTC"),
        ("currency", "USD"),
        ("currencyFormat", "$1,000.00"),
    ];
    for (k, v) in pairs {
        fields.retain(|(name, _)| name != k);
        fields.push((*k, *v));
    }
    RawSettingsForm::from_fields(fields)
}

pub fn png(name: &str) -> LogoUpload {
    LogoUpload {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}
