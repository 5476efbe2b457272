//! JSON-file backed state store.
//!
//! Each dashboard domain (tasks, status, costs, second factor) lives in its
//! own file and is its own serialization domain: `update` holds a per-file
//! lock for the whole read-mutate-persist sequence, so two updates on the
//! same domain never interleave, while updates on different domains proceed
//! independently. Readers never take the lock.

use crate::{
    auth::SecondFactorRecord,
    model::{AgentStatus, CostLedger, TaskRecord},
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use ulid::Ulid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One durable value of type `T`, bound to a single JSON file.
pub struct StateFile<T> {
    path: PathBuf,
    default: T,
    write_lock: Mutex<()>,
}

impl<T> StateFile<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(path: PathBuf, default: T) -> Self {
        Self {
            path,
            default,
            write_lock: Mutex::new(()),
        }
    }

    /// Decode the current persisted value. An absent file yields the default.
    ///
    /// # Errors
    /// `StoreError::Unavailable` if the file cannot be read,
    /// `StoreError::Corrupt` if it cannot be decoded.
    pub async fn read(&self) -> Result<T, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(self.default.clone());
            }
            Err(error) => return Err(StoreError::Unavailable(error)),
        };

        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Read, apply `mutate`, persist, and return the new value together with
    /// whatever the mutator produced.
    ///
    /// The whole sequence runs under the file's write lock; a failure while
    /// persisting leaves the previously stored value intact (the new payload
    /// is written to a temp file and renamed over the old one).
    ///
    /// # Errors
    /// Propagates `read` failures and persist failures.
    pub async fn update<R>(&self, mutate: impl FnOnce(&mut T) -> R) -> Result<(T, R), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut value = self.read().await?;
        let out = mutate(&mut value);
        self.persist(&value).await?;

        Ok((value, out))
    }

    /// Write the default value if the file does not exist yet.
    pub async fn seed(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        self.persist(&self.default).await
    }

    async fn persist(&self, value: &T) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Ulid::new().to_string().to_lowercase()));
        tokio::fs::write(&temp_path, payload).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}

/// The four serialization domains of the dashboard.
pub struct Store {
    pub tasks: StateFile<Vec<TaskRecord>>,
    pub status: StateFile<AgentStatus>,
    pub costs: StateFile<CostLedger>,
    pub second_factor: StateFile<Option<SecondFactorRecord>>,
}

impl Store {
    /// Open the store under `data_dir`, creating the directory and seeding
    /// missing files with their defaults.
    ///
    /// # Errors
    /// Returns an error if the directory or any seed file cannot be written.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir).await?;

        let store = Self {
            tasks: StateFile::new(data_dir.join("tasks.json"), Vec::new()),
            status: StateFile::new(
                data_dir.join("status.json"),
                AgentStatus::initial(Utc::now()),
            ),
            costs: StateFile::new(data_dir.join("costs.json"), CostLedger::initial(Utc::now())),
            second_factor: StateFile::new(data_dir.join("second_factor.json"), None),
        };

        store.tasks.seed().await?;
        store.status.seed().await?;
        store.costs.seed().await?;
        store.second_factor.seed().await?;

        Ok(store)
    }
}
