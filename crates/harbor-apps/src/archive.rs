//! In-memory reading of app package archives.
//!
//! An app package ships as a zip archive, usually transported as base64
//! text. `AppArchive` decodes and reads every entry up front so the rest
//! of the ingestion pipeline works over plain in-memory data instead of
//! a live zip handle. Entries keep the archive's central-directory
//! order, which is the order later stages rely on when merging
//! duplicate localization files.

use std::io::{Cursor, Read};
use thiserror::Error;

use base64::Engine;

/// Errors that can occur while opening an app package archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The base64 transport encoding is corrupt.
    #[error("package is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The archive itself is corrupt or not a zip file.
    #[error("failed to open package archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An entry's content could not be read.
    #[error("failed to read archive entry '{path}': {source}")]
    EntryRead {
        path: String,
        source: std::io::Error,
    },
}

/// A single archive entry, fully loaded.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path of the entry inside the archive, as stored.
    pub path: String,

    /// Whether the entry is a directory marker.
    pub is_dir: bool,

    /// Raw content bytes (empty for directories).
    pub data: Vec<u8>,
}

/// An app package archive with all entries loaded into memory.
#[derive(Debug, Clone)]
pub struct AppArchive {
    entries: Vec<ArchiveEntry>,
}

impl AppArchive {
    /// Open an archive from base64-encoded zip bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid base64 or the decoded
    /// bytes are not a readable zip archive.
    pub fn from_base64(encoded: &str) -> Result<Self, ArchiveError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        Self::from_bytes(&bytes)
    }

    /// Open an archive from raw zip bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable zip archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(zip.len());

        for index in 0..zip.len() {
            let mut file = zip.by_index(index)?;
            let path = file.name().to_string();
            let is_dir = file.is_dir();

            let mut data = Vec::new();
            if !is_dir {
                file.read_to_end(&mut data)
                    .map_err(|source| ArchiveError::EntryRead {
                        path: path.clone(),
                        source,
                    })?;
            }

            entries.push(ArchiveEntry { path, is_dir, data });
        }

        Ok(Self { entries })
    }

    /// All entries, in central-directory order.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Look up an entry by its exact stored path.
    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }
}
