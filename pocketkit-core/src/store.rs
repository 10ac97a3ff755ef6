//! JSON-file backed record stores.
//!
//! Each store owns its records in memory and rewrites its file after every
//! change. Writes go to a temporary file next to the target and are renamed
//! into place, so a crash never leaves a half-written document behind.

use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::error::StoreError;

pub mod history;
pub mod vault;

pub use history::{BmiHistory, BmiTrend, HistoryStats};
pub use vault::PasswordVault;

/// Version tag written into every document.
pub const FORMAT_VERSION: u32 = 1;

/// A document as found on disk: the current versioned shape or the bare
/// legacy one.
#[derive(Debug)]
pub(crate) enum Stored<V, L> {
    Versioned(V),
    Legacy(L),
}

/// Read `path`. A missing file is `Ok(None)`.
fn read_contents(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no record file yet");
            Ok(None)
        }
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read and parse `path`, picking the shape by the top-level `version` key.
///
/// The shape is decided first so a bad field reports its own line and column.
pub(crate) fn read_stored<V, L>(path: &Path) -> Result<Option<Stored<V, L>>, StoreError>
where
    V: DeserializeOwned,
    L: DeserializeOwned,
{
    let Some(contents) = read_contents(path)? else {
        return Ok(None);
    };

    let parse_err = |source: serde_json::Error| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let shape: serde_json::Value = serde_json::from_str(&contents).map_err(parse_err)?;
    let stored = if shape.get("version").is_some_and(serde_json::Value::is_u64) {
        serde_json::from_str(&contents).map(Stored::Versioned)
    } else {
        serde_json::from_str(&contents).map(Stored::Legacy)
    };

    stored.map(Some).map_err(parse_err)
}

pub(crate) fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(document)?;

    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(write_err)?;

    let mut temp = NamedTempFile::new_in(&parent).map_err(write_err)?;
    temp.write_all(json.as_bytes()).map_err(write_err)?;
    temp.write_all(b"\n").map_err(write_err)?;
    temp.persist(path).map_err(|err| write_err(err.error))?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "records saved");
    Ok(())
}

/// Documents from a newer release still load; unknown fields are ignored.
pub(crate) fn check_version(version: u32, path: &Path) {
    if version > FORMAT_VERSION {
        tracing::warn!(
            path = %path.display(),
            found = version,
            supported = FORMAT_VERSION,
            "record file was written by a newer version; unknown fields will be dropped on save"
        );
    }
}
