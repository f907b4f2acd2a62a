use std::time::Duration;

use crate::config::settings::AppConfig;
use crate::infrastructure::audit::AuditLog;
use crate::infrastructure::store::{DocumentStore, LockSettings};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: DocumentStore,
    pub audit: AuditLog,
}

impl AppState {
    pub fn new(config: AppConfig, store: DocumentStore, audit: AuditLog) -> Self {
        Self {
            config,
            store,
            audit,
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let settings = LockSettings {
            retries: config.lock_retries,
            min_wait: Duration::from_millis(config.lock_min_wait_ms),
            max_wait: Duration::from_millis(config.lock_max_wait_ms),
        };
        let store = DocumentStore::with_settings(&config.data_dir, settings);
        let audit = AuditLog::new(&config.data_dir);
        Self::new(config, store, audit)
    }
}
