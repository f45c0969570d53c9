//! The app package ingestion pipeline.
//!
//! Orchestrates the full path from base64-encoded archive to an
//! install-ready `ParsedPackage`: open the archive, validate the
//! manifest, collect sources and localization bundles, invoke the
//! host's compiler, and attach the icon. Each stage's failure aborts
//! the whole attempt; a partial result is never returned.

use std::collections::BTreeMap;
use thiserror::Error;

use semver::Version;

use crate::archive::{AppArchive, ArchiveError};
use crate::compiler::{AppCompiler, CompilerError};
use crate::diagnostics::ParseWarning;
use crate::i18n::{self, LanguageContent};
use crate::icon::{self, IconError};
use crate::manifest::{AppManifest, ManifestError, ManifestValidator, MANIFEST_FILE};
use crate::sources::{self, SourceError};

/// Errors that can abort a package ingestion.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The archive could not be decoded or opened.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The archive has no manifest entry at its root.
    #[error("invalid app package: no \"{MANIFEST_FILE}\" file")]
    MissingManifest,

    /// The manifest failed parsing or validation.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Source collection failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The declared icon is malformed.
    #[error(transparent)]
    Icon(#[from] IconError),

    /// The compiler reported a failure, forwarded unchanged.
    #[error(transparent)]
    Compile(#[from] CompilerError),
}

/// The install-ready result of a successful ingestion.
///
/// Immutable once returned; the installation layer owns it from here.
#[derive(Debug, Clone)]
pub struct ParsedPackage {
    /// The validated manifest, id patched and icon attached when present.
    pub manifest: AppManifest,

    /// Compiled output keyed by the filesystem-safe form of each
    /// normalized source path.
    pub compiled_files: BTreeMap<String, String>,

    /// Merged translation dictionaries keyed by language code.
    pub language_content: LanguageContent,

    /// Non-fatal advisories raised along the way.
    pub warnings: Vec<ParseWarning>,
}

/// Ingests app package archives for a host with a fixed API version.
#[derive(Debug, Clone)]
pub struct PackageParser {
    validator: ManifestValidator,
}

impl PackageParser {
    /// Create a parser that validates packages against the given host
    /// API version.
    #[must_use]
    pub fn new(host_version: Version) -> Self {
        Self {
            validator: ManifestValidator::new(host_version),
        }
    }

    /// The host API version packages are validated against.
    #[must_use]
    pub fn host_version(&self) -> &Version {
        self.validator.host_version()
    }

    /// Ingest a base64-encoded app package archive.
    ///
    /// Apart from the compiler invocation every stage is a synchronous
    /// in-memory transformation; the compiler is the only point where
    /// this suspends.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure; see [`ParseError`]. No partial
    /// result is ever produced.
    pub async fn parse_zip(
        &self,
        compiler: &impl AppCompiler,
        zip_base64: &str,
    ) -> Result<ParsedPackage, ParseError> {
        let archive = AppArchive::from_base64(zip_base64)?;

        let manifest_entry = archive
            .entry(MANIFEST_FILE)
            .filter(|entry| !entry.is_dir)
            .ok_or(ParseError::MissingManifest)?;

        let (mut manifest, mut warnings) = self.validator.validate(&manifest_entry.data)?;

        let source_files = sources::collect_sources(archive.entries(), &manifest)?;

        let (language_content, language_warnings) = i18n::collect_languages(archive.entries());
        warnings.extend(language_warnings);

        let compiled = compiler.compile(&manifest, source_files).await?;

        let mut compiled_files = BTreeMap::new();
        for (name, file) in compiled {
            compiled_files.insert(escape_path(&name), file.compiled.unwrap_or_default());
        }

        if let Some(encoded) = icon::extract_icon(&archive, manifest.icon_file.as_deref())? {
            manifest.icon_file_content = Some(encoded);
        }

        Ok(ParsedPackage {
            manifest,
            compiled_files,
            language_content,
            warnings,
        })
    }
}

/// Re-key a source path into a form safe to use as a flat filename:
/// separators and dots become `$`.
fn escape_path(path: &str) -> String {
    path.replace(['/', '.'], "$")
}
