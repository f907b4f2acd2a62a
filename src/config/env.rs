use std::env;
use std::str::FromStr;

pub enum EnvKey {
    DataDir,
    LockRetries,
    LockMinWaitMs,
    LockMaxWaitMs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::DataDir => "DATA_DIR",
            EnvKey::LockRetries => "LOCK_RETRIES",
            EnvKey::LockMinWaitMs => "LOCK_MIN_WAIT_MS",
            EnvKey::LockMaxWaitMs => "LOCK_MAX_WAIT_MS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
