// src/store.rs
//! Durable record of the last check: one JSON document, replaced whole on every run.
//!
//! ```json
//! {
//!   "digest": "<sha-256 hex>",
//!   "timestamp": "2025-10-20T06:00:00.000Z",
//!   "version": 1,
//!   "data": ["01:00 - 02:00", "03:00 - 04:00"]
//! }
//! ```
//! Records written by older builds used the key `md5`; they still load.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fingerprint::Fingerprint;

/// Newest record layout this build reads and the one it always writes.
pub const STATE_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(alias = "md5")]
    pub digest: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub data: Vec<String>,
}

impl PersistedState {
    pub fn new(fingerprint: &Fingerprint, timestamp: DateTime<Utc>, data: Vec<String>) -> Self {
        Self {
            digest: fingerprint.as_str().to_string(),
            timestamp,
            version: STATE_VERSION,
            data,
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_hex(self.digest.as_str())
    }
}

/// Read/write access to the single state record.
pub trait StateStore {
    /// `Ok(None)` when no record exists yet.
    fn read(&self) -> Result<Option<PersistedState>, StoreError>;
    fn write(&self, state: &PersistedState) -> Result<(), StoreError>;
    fn location(&self) -> String;
}

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Parse a stored record; unknown future versions count as unreadable.
pub fn parse_state(text: &str, path: &Path) -> Result<PersistedState, StoreError> {
    let state: PersistedState = serde_json::from_str(text).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if state.version > STATE_VERSION {
        return Err(StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("unsupported version {} (newest known {STATE_VERSION})", state.version),
        });
    }
    Ok(state)
}

/// Pretty JSON with non-ASCII kept verbatim, trailing newline.
pub fn render_state(state: &PersistedState) -> Result<String, StoreError> {
    let mut text = serde_json::to_string_pretty(state)?;
    text.push('\n');
    Ok(text)
}

impl StateStore for FileStore {
    fn read(&self) -> Result<Option<PersistedState>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        parse_state(&text, &self.path).map(Some)
    }

    /// Write to a sibling temp file, then rename over the record.
    fn write(&self, state: &PersistedState) -> Result<(), StoreError> {
        let text = render_state(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let tmp = self.tmp_path();
        let result = fs::File::create(&tmp)
            .and_then(|mut f| {
                f.write_all(text.as_bytes())?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err(e));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
