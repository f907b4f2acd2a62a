use std::path::PathBuf;

use serde::Deserialize;

use crate::config::env::{self, EnvKey};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub lock_retries: u32,
    pub lock_min_wait_ms: u64,
    pub lock_max_wait_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env::get_or(EnvKey::DataDir, "data")),
            lock_retries: env::get_parsed(EnvKey::LockRetries, 5),
            lock_min_wait_ms: env::get_parsed(EnvKey::LockMinWaitMs, 50),
            lock_max_wait_ms: env::get_parsed(EnvKey::LockMaxWaitMs, 200),
        }
    }
}
