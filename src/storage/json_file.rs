use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::{StorageCause, StoreError};
use super::store::UserStore;
use super::types::{RecordSet, User, UserId, UserPatch, Users};

/// [`UserStore`] backed by a single JSON file.
///
/// Each operation reads the whole file, works on the decoded [`RecordSet`] and,
/// if it changed anything, writes the whole file back. One mutex guards the
/// full cycle, so operations on the same store never interleave. Nothing is
/// cached between calls; the file is the only source of truth.
///
/// Only the wait for the mutex can be cancelled. Once a caller holds it, the
/// cycle runs on its own task together with the guard and finishes even if the
/// caller's future is dropped, so an abandoned request can neither leave a
/// half-written temp file nor write after the lock was released.
pub struct JsonFileStore {
    file: Arc<RecordFile>,
    cycle: Arc<Mutex<()>>,
    lock_timeout: Option<Duration>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Arc::new(RecordFile { path: path.into() }),
            cycle: Arc::new(Mutex::new(())),
            lock_timeout: None,
        }
    }

    /// Gives up with `StorageUnavailable` when the mutex is not free within `limit`.
    pub fn with_lock_timeout(mut self, limit: Duration) -> Self {
        self.lock_timeout = Some(limit);
        self
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    async fn acquire(&self) -> Result<OwnedMutexGuard<()>, StoreError> {
        let lock = self.cycle.clone().lock_owned();
        match self.lock_timeout {
            None => Ok(lock.await),
            Some(waited) => tokio::time::timeout(waited, lock)
                .await
                .map_err(|_| self.file.unavailable(StorageCause::Busy { waited })),
        }
    }

    /// Loads the record set, hands it to `apply` and, if `persist` is set and
    /// `apply` succeeded, writes it back.
    async fn run_cycle<T, F>(&self, persist: bool, apply: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut RecordSet) -> Result<T, StoreError> + Send + 'static,
    {
        let guard = self.acquire().await?;
        let file = self.file.clone();

        let cycle = tokio::spawn(async move {
            let _guard = guard;
            let mut records = file.load().await?;
            let output = apply(&mut records)?;
            if persist {
                file.persist(&records).await?;
            }
            Ok::<T, StoreError>(output)
        });

        cycle
            .await
            .map_err(|e| self.file.unavailable(StorageCause::Interrupted(e)))?
    }
}

struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    fn unavailable(&self, cause: StorageCause) -> StoreError {
        StoreError::StorageUnavailable {
            path: self.path.clone(),
            cause,
        }
    }

    fn io_failure(&self, action: &'static str, source: io::Error) -> StoreError {
        self.unavailable(StorageCause::Io { action, source })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("records"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Reads the current record set. Caller must hold the cycle mutex.
    async fn load(&self) -> Result<RecordSet, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.initialize().await,
            Err(e) => return Err(self.io_failure("read record file", e)),
        };

        let mut records: RecordSet = serde_json::from_slice(&bytes)
            .map_err(|e| self.unavailable(StorageCause::Malformed(e)))?;
        records.reconcile_increment();
        Ok(records)
    }

    /// Writes the canonical empty state. Caller must hold the cycle mutex.
    async fn initialize(&self) -> Result<RecordSet, StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_failure("create data directory", e))?;
        }

        let records = RecordSet::default();
        self.persist(&records).await?;
        tracing::debug!("Initialized empty record file {}", self.path.display());
        Ok(records)
    }

    /// Replaces the file with `records` via temp file + rename. Caller must hold the cycle mutex.
    async fn persist(&self, records: &RecordSet) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| self.unavailable(StorageCause::Malformed(e)))?;
        let temp_path = self.temp_path();

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| self.io_failure("create temporary file", e))?;
        file.write_all(&json)
            .await
            .map_err(|e| self.io_failure("write temporary file", e))?;
        file.sync_all()
            .await
            .map_err(|e| self.io_failure("sync temporary file", e))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_failure("replace record file", e))?;

        tracing::debug!(
            "Persisted {} users (increment={}) to {}",
            records.users.len(),
            records.increment,
            self.path.display()
        );
        Ok(())
    }
}

impl UserStore for JsonFileStore {
    async fn list(&self) -> Result<Users, StoreError> {
        self.run_cycle(false, |records| Ok(std::mem::take(&mut records.users)))
            .await
    }

    async fn add(&self, user: User) -> Result<UserId, StoreError> {
        let path = self.file.path.clone();
        self.run_cycle(true, move |records| {
            records.add(user).ok_or(StoreError::StorageUnavailable {
                path,
                cause: StorageCause::CounterExhausted,
            })
        })
        .await
    }

    async fn get(&self, id: &UserId) -> Result<User, StoreError> {
        let id = id.clone();
        self.run_cycle(false, move |records| records.get(&id).cloned())
            .await
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, StoreError> {
        let id = id.clone();
        self.run_cycle(true, move |records| records.update(&id, patch).cloned())
            .await
    }

    async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        let id = id.clone();
        self.run_cycle(true, move |records| records.remove(&id).map(drop))
            .await
    }
}
