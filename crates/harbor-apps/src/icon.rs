//! Extraction of the app's declared icon from its package archive.
//!
//! Icons are optional. An undeclared icon, an extension outside the
//! allow-list, or a declared path with no matching entry all yield no
//! icon and the package still installs. Declaring a path that turns out
//! to be a directory is a hard error.

use thiserror::Error;

use base64::Engine;

use crate::archive::AppArchive;

/// Icon file extensions accepted for transport (lower-cased, no dot).
pub const ALLOWED_ICON_EXTS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Errors that can occur while extracting the declared icon.
#[derive(Error, Debug)]
pub enum IconError {
    /// The manifest points at a directory instead of a file.
    #[error("declared icon '{path}' is a directory, not a file")]
    NotFile { path: String },
}

/// Load the declared icon and encode its bytes as base64.
///
/// # Errors
///
/// Returns an error if the declared path resolves to a directory entry.
pub fn extract_icon(
    archive: &AppArchive,
    icon_file: Option<&str>,
) -> Result<Option<String>, IconError> {
    let Some(path) = icon_file else {
        return Ok(None);
    };

    let allowed = path
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_ICON_EXTS.contains(&ext.to_lowercase().as_str()));
    if !allowed {
        return Ok(None);
    }

    // Directory entries carry a trailing slash in the archive, so match
    // the declared path against both forms.
    let Some(entry) = archive
        .entries()
        .iter()
        .find(|entry| entry.path == path || entry.path.trim_end_matches('/') == path)
    else {
        return Ok(None);
    };

    if entry.is_dir {
        return Err(IconError::NotFile {
            path: path.to_string(),
        });
    }

    Ok(Some(
        base64::engine::general_purpose::STANDARD.encode(&entry.data),
    ))
}
