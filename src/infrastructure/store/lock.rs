use std::fs::{File, TryLockError};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use tracing::trace;

use super::{LockSettings, sibling};
use crate::error::{Result, StoreError};

const BACKOFF_FACTOR: f64 = 1.5;

/// Held advisory lock for one document path. Released on drop.
#[derive(Debug)]
pub(super) struct PathLock {
    file: File,
}

impl Drop for PathLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Take the cross-process lock guarding `target`, retrying with bounded
/// exponential backoff. The lock lives on a persistent `<target>.lock`
/// sibling: the atomic rename over `target` must never invalidate a lock
/// someone else is still holding.
pub(super) async fn acquire(target: &Path, settings: &LockSettings) -> Result<PathLock> {
    let lock_path = sibling(target, ".lock");
    let file = tokio::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .await?
        .into_std()
        .await;

    let attempts = settings.retries + 1;
    let mut wait = settings.min_wait;
    for attempt in 1..=attempts {
        match file.try_lock() {
            Ok(()) => return Ok(PathLock { file }),
            Err(TryLockError::WouldBlock) => {}
            Err(TryLockError::Error(err)) => return Err(err.into()),
        }
        if attempt == attempts {
            break;
        }
        trace!(path = %target.display(), attempt, "lock busy, backing off");
        tokio::time::sleep(wait + jitter()).await;
        wait = wait.mul_f64(BACKOFF_FACTOR).min(settings.max_wait);
    }

    Err(StoreError::LockTimeout {
        path: target.to_path_buf(),
        attempts,
    })
}

fn jitter() -> Duration {
    Duration::from_millis(rand::rng().random_range(0..=10))
}
