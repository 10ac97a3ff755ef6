use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{FORMAT_VERSION, Stored, check_version, read_stored, write_document};
use crate::{error::StoreError, model::SavedPasswordEntry};

#[derive(Serialize)]
struct VaultDocumentRef<'a> {
    version: u32,
    entries: &'a [SavedPasswordEntry],
}

#[derive(Deserialize)]
struct VaultDocument {
    version: u32,
    entries: Vec<SavedPasswordEntry>,
}

type StoredVault = Stored<VaultDocument, Vec<SavedPasswordEntry>>;

/// Saved passwords, oldest first. Entries are append-only.
#[derive(Debug, Default)]
pub struct PasswordVault {
    path: Option<PathBuf>,
    entries: Vec<SavedPasswordEntry>,
}

impl PasswordVault {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = match read_stored(&path)? {
            None => Vec::new(),
            Some(StoredVault::Versioned(document)) => {
                check_version(document.version, &path);
                document.entries
            }
            Some(StoredVault::Legacy(entries)) => {
                tracing::info!(path = %path.display(), "loaded unversioned password vault");
                entries
            }
        };

        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append and persist. The entry stays in memory even if writing fails.
    pub fn add(&mut self, entry: SavedPasswordEntry) -> Result<(), StoreError> {
        tracing::debug!(website = %entry.website, length = entry.length, "password saved");
        self.entries.push(entry);
        self.persist()
    }

    pub fn entries(&self) -> &[SavedPasswordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => write_document(
                path,
                &VaultDocumentRef {
                    version: FORMAT_VERSION,
                    entries: &self.entries,
                },
            ),
            None => Ok(()),
        }
    }
}
