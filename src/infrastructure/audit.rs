use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

const AUDIT_FILE: &str = "audit.log";

/// Append-only audit trail shared by every mutating repository call.
/// Entries are never rewritten; insertion order is the only ordering
/// guarantee.
#[derive(Clone, Debug)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(AUDIT_FILE),
        }
    }

    /// Append one `timestamp<TAB>actor<TAB>action` line. An empty actor is
    /// recorded as `system`.
    pub async fn append(&self, actor: &str, action: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
        let actor = if actor.is_empty() { "system" } else { actor };
        let line = format!("{timestamp}\t{actor}\t{action}\n");
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
