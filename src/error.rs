use std::path::PathBuf;

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("could not lock {} after {attempts} attempts", .path.display())]
    LockTimeout { path: PathBuf, attempts: u32 },

    #[error("corrupt document {}: {source}", .path.display())]
    CorruptDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("credential hashing failed: {0}")]
    Credentials(String),

    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl StoreError {
    /// Collapse a validator error tree into a single aggregated list of
    /// violations, so callers see every problem with a payload at once.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut failures = Vec::new();
        collect(String::new(), errors, &mut failures);
        failures.sort();
        Self::Validation(failures)
    }
}

fn collect(prefix: String, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    match &err.message {
                        Some(message) => out.push(format!("{path}: {message}")),
                        None => out.push(format!("{path}: invalid value ({})", err.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}
