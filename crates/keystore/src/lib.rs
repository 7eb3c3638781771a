//! # Organization Key Store
//!
//! Resolves an organization's platform API key from a flat text file of
//! `name=key` lines. Organization names are unique keys into the file. The
//! file is read on every lookup, so key changes take effect without a
//! restart; lookups are read-only.

use std::fs;
use std::path::Path;

/// Key store errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing key file could not be read.
    #[error("issue reading key file: {0}")]
    Io(#[from] std::io::Error),

    /// A line in the key file is not in `name=key` form.
    #[error("malformed key file entry: {0}")]
    MalformedEntry(String),

    /// No key is recorded for the organization.
    #[error("no API key for organization: {0}")]
    NotFound(String),
}

/// Look up the platform API key for the named organization.
///
/// Names and keys are trimmed of surrounding whitespace; blank lines are
/// ignored.
///
/// # Errors
///
/// Returns [`Error::Io`] if the key file cannot be read,
/// [`Error::MalformedEntry`] if a line has no `=` separator, and
/// [`Error::NotFound`] if the organization has no entry.
pub fn api_key(path: impl AsRef<Path>, name: &str) -> Result<String, Error> {
    let contents = fs::read_to_string(path)?;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((entry_name, key)) = line.split_once('=') else {
            return Err(Error::MalformedEntry(line.to_string()));
        };
        if entry_name.trim() == name {
            return Ok(key.trim().to_string());
        }
    }

    Err(Error::NotFound(name.to_string()))
}
