use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{InvoiceError, Result};

/// A file created through a [`Storage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// Path relative to the storage root, as requested
    pub path: String,
    /// Location on disk (or wherever the storage keeps it)
    pub location: PathBuf,
}

/// Where invoice documents are written. Paths are `/`-separated and relative to the
/// storage root.
pub trait Storage {
    fn exists(&self, path: &str) -> bool;

    /// Create a folder and any missing parents. Succeeds if it already exists.
    fn mkdir(&self, path: &str) -> Result<()>;

    /// Create a new file. Fails with [`InvoiceError::InvoiceExists`] instead of
    /// replacing an existing one.
    fn create_file(&self, path: &str, content: &str) -> Result<FileHandle>;
}

/// [`Storage`] backed by a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn mkdir(&self, path: &str) -> Result<()> {
        let dir = self.resolve(path);
        fs::create_dir_all(&dir).map_err(|e| InvoiceError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;
        debug!("Ensured folder {}", dir.display());
        Ok(())
    }

    fn create_file(&self, path: &str, content: &str) -> Result<FileHandle> {
        let location = self.resolve(path);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&location)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => InvoiceError::InvoiceExists(location.clone()),
                _ => InvoiceError::WriteInvoice {
                    path: location.clone(),
                    source: e,
                },
            })?;

        file.write_all(content.as_bytes())
            .map_err(|e| InvoiceError::WriteInvoice {
                path: location.clone(),
                source: e,
            })?;

        Ok(FileHandle {
            path: path.to_string(),
            location,
        })
    }
}
