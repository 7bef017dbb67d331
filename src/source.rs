// src/source.rs
//! Where the table markup comes from.
//!
//! The live site needs a scripted browser to fill in the address form; that
//! collaborator lives outside this crate and hands over the rendered table,
//! either as a saved file or on stdin.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::config::Address;
use crate::error::SourceError;

pub trait ContentSource {
    /// Raw HTML of the rendered schedule table for `address`.
    fn fetch(&self, address: &Address) -> Result<String, SourceError>;
}

/// A fragment saved to disk by the browser step.
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn fetch(&self, address: &Address) -> Result<String, SourceError> {
        logd!("Reading table for {address} from {}", self.path.display());
        let html = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            origin: self.path.display().to_string(),
            source,
        })?;
        non_empty(html)
    }
}

/// A fragment piped in by the browser step.
pub struct StdinSource;

impl ContentSource for StdinSource {
    fn fetch(&self, address: &Address) -> Result<String, SourceError> {
        logd!("Reading table for {address} from stdin");
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .map_err(|source| SourceError::Io { origin: s!("stdin"), source })?;
        non_empty(html)
    }
}

fn non_empty(html: String) -> Result<String, SourceError> {
    if html.trim().is_empty() {
        Err(SourceError::Empty)
    } else {
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address { city: s!("c"), street: s!("s"), house: s!("1") }
    }

    #[test]
    fn file_source_reads_and_rejects_blank() {
        let dir = tempfile::tempdir().unwrap();
        let full = dir.path().join("table.html");
        fs::write(&full, "<table></table>").unwrap();
        assert_eq!(FileSource::new(&full).fetch(&address()).unwrap(), "<table></table>");

        let blank = dir.path().join("blank.html");
        fs::write(&blank, " \n").unwrap();
        assert!(matches!(FileSource::new(&blank).fetch(&address()), Err(SourceError::Empty)));

        let missing = dir.path().join("nope.html");
        assert!(matches!(FileSource::new(missing).fetch(&address()), Err(SourceError::Io { .. })));
    }
}
