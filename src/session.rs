use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// On-disk record of one named browser session. The port is the only link to
/// the running process; no pid or other identity is tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub port: u16,
    pub session: String,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub external: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl SessionRecord {
    pub fn new(session: &str, port: u16, external: bool) -> Self {
        Self {
            port,
            session: session.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            external,
        }
    }
}

/// One JSON file per session name. No locking: a single CLI invocation per
/// session at a time is assumed.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn open_default() -> Self {
        Self::new(crate::config::sessions_dir())
    }

    fn record_path(&self, session: &str) -> PathBuf {
        self.dir.join(format!("{session}.json"))
    }

    /// Missing and unparsable files both read as absent.
    pub fn read(&self, session: &str) -> Option<SessionRecord> {
        let content = fs::read_to_string(self.record_path(session)).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn write(&self, record: &SessionRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(&record.session), content)?;
        Ok(())
    }

    pub fn clear(&self, session: &str) -> Result<()> {
        let path = self.record_path(session);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
