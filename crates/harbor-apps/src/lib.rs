//! App package ingestion for the Harbor host application.
//!
//! Takes a third-party app distributed as a zip archive, validates its
//! `app.json` manifest, collects and normalizes its source files,
//! assembles localization bundles, extracts the declared icon, and
//! invokes the host's compiler to produce an install-ready package.
//!
//! This crate provides:
//! - Manifest parsing with identity and API-version validation
//! - Source file collection with path normalization
//! - Localization bundle assembly from `i18n/` dictionaries
//! - Icon extraction and transport encoding
//! - The [`PackageParser`] pipeline tying it all together
//!
//! Compilation and durable storage are host capabilities; this crate
//! only defines their contracts ([`AppCompiler`], [`PersistenceBridge`]).

mod archive;
mod compiler;
mod diagnostics;
mod i18n;
mod icon;
mod manifest;
mod parser;
mod persistence;
mod sources;

pub use archive::{AppArchive, ArchiveEntry, ArchiveError};
pub use compiler::{AppCompiler, CompilerError};
pub use diagnostics::ParseWarning;
pub use i18n::{LanguageContent, I18N_DIR};
pub use icon::{IconError, ALLOWED_ICON_EXTS};
pub use manifest::{AppManifest, ManifestError, ManifestValidator, MANIFEST_FILE};
pub use parser::{PackageParser, ParseError, ParsedPackage};
pub use persistence::{AssociationRecord, PersistenceBridge, PersistenceRead};
pub use sources::{normalize_path, SourceError, SourceFile, SOURCE_EXT};
