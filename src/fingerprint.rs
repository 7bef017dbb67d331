// src/fingerprint.rs
use std::fmt;

use sha2::{Digest, Sha256};

use crate::core::sanitize::normalize_ws;

/// Content hash of an interval list. Used for change detection only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash of the normalized lines joined with `\n`. Order matters.
    pub fn of_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let joined = normalize_lines(lines).join("\n");
        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        Fingerprint(format!("{:x}", hasher.finalize()))
    }

    /// Wrap a digest read back from storage.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Fingerprint(hex.into().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whitespace-normalized copy of each line; this is what gets hashed and stored.
pub fn normalize_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines.iter().map(|l| normalize_ws(l.as_ref())).collect()
}
