//! JSON documents on disk, one file per document. Writes go through a
//! temp-file-plus-rename sequence so readers never observe a partially
//! written document, and every read-modify-write cycle runs under a
//! per-path advisory lock.

mod lock;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Retry budget for advisory lock acquisition: one immediate attempt plus
/// `retries` retries, waiting `min_wait` at first and backing off up to
/// `max_wait`.
#[derive(Clone, Debug)]
pub struct LockSettings {
    pub retries: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            retries: 5,
            min_wait: Duration::from_millis(50),
            max_wait: Duration::from_millis(200),
        }
    }
}

/// Handle over a root data directory. Cheap to clone; every operation
/// addresses a document by its path relative to the root.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    root: PathBuf,
    lock: LockSettings,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_settings(root, LockSettings::default())
    }

    pub fn with_settings(root: impl Into<PathBuf>, lock: LockSettings) -> Self {
        Self {
            root: root.into(),
            lock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a document, seeding the file with `default` when it does not
    /// exist yet. An empty file also reads as `default` but is left as is.
    pub async fn read<T>(&self, relative: &str, default: T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = self.resolve(relative);
        self.ensure_parent(&path).await?;
        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Ok(default),
            Ok(bytes) => parse(&path, &bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.write(relative, &default).await?;
                Ok(default)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Read a document that may legitimately be absent. Missing and empty
    /// files yield `None`; nothing is written.
    pub async fn read_opt<T>(&self, relative: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let path = self.resolve(relative);
        self.ensure_parent(&path).await?;
        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => parse(&path, &bytes).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Serialize `value` and move it into place atomically, under the
    /// path's lock.
    pub async fn write<T>(&self, relative: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.resolve(relative);
        self.ensure_parent(&path).await?;
        let _guard = lock::acquire(&path, &self.lock).await?;
        self.persist(&path, value).await
    }

    /// Guarded read-modify-write cycle, the sole primitive for mutating a
    /// document. The path's lock is held from before the read until after
    /// the rename; an error from `updater` propagates to the caller with
    /// the lock released. `updater` receives the current document, or
    /// `default` when the file is absent or empty.
    pub async fn update<T, F>(&self, relative: &str, default: Option<T>, updater: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> Result<T>,
    {
        let path = self.resolve(relative);
        self.ensure_parent(&path).await?;
        let _guard = lock::acquire(&path, &self.lock).await?;
        let current = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => default,
            Ok(bytes) => Some(parse(&path, &bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => default,
            Err(err) => return Err(err.into()),
        };
        let next = updater(current)?;
        self.persist(&path, &next).await?;
        debug!(path = %path.display(), "updated document");
        Ok(next)
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    async fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn persist<T>(&self, path: &Path, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_vec_pretty(value).map_err(StoreError::Serialize)?;
        let tmp = sibling(path, ".tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

fn parse<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::CorruptDocument {
        path: path.to_path_buf(),
        source,
    })
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
