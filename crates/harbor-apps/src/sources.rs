//! Collection of an app's source files from its package archive.
//!
//! Source entries are selected by extension, their paths normalized,
//! and hidden paths dropped. The declared entry-point file must be
//! present in the collected set or the whole package is rejected.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::archive::ArchiveEntry;
use crate::manifest::AppManifest;

/// Extension of app source files, including the dot.
pub const SOURCE_EXT: &str = ".ts";

/// Errors that can occur while collecting source files.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The manifest's declared entry point is not in the archive.
    #[error("could not find the classFile ({class_file}) declared by '{name}'")]
    MissingEntryPoint { name: String, class_file: String },
}

/// A single source file collected from the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Normalized archive-relative path; the uniqueness key.
    pub name: String,

    /// Raw textual content.
    pub content: String,

    /// Revision counter; starts at zero, never decreases.
    pub version: u32,

    /// Compiled output, attached by the compiler capability.
    pub compiled: Option<String>,
}

/// Normalize an archive path: drop `.` segments and redundant
/// separators, resolve `..` against earlier segments.
///
/// Leading `..` segments that cannot be resolved are kept, which makes
/// paths escaping the archive root look hidden and get filtered out.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Collect the package's source files, keyed by normalized path.
///
/// Entries whose normalized path starts with `.` are hidden and
/// silently skipped; archives use this for files meant to be ignored.
///
/// # Errors
///
/// Returns an error if the manifest's `classFile` is not among the
/// collected files.
pub fn collect_sources(
    entries: &[ArchiveEntry],
    manifest: &AppManifest,
) -> Result<BTreeMap<String, SourceFile>, SourceError> {
    let mut sources = BTreeMap::new();

    for entry in entries {
        if entry.is_dir || !entry.path.ends_with(SOURCE_EXT) {
            continue;
        }

        let name = normalize_path(&entry.path);
        if name.starts_with('.') {
            continue;
        }

        let content = String::from_utf8_lossy(&entry.data).into_owned();
        sources.insert(
            name.clone(),
            SourceFile {
                name,
                content,
                version: 0,
                compiled: None,
            },
        );
    }

    let class_file = normalize_path(&manifest.class_file);
    if !sources.contains_key(&class_file) {
        return Err(SourceError::MissingEntryPoint {
            name: manifest.name.clone(),
            class_file: manifest.class_file.clone(),
        });
    }

    Ok(sources)
}
