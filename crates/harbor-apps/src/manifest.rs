//! App manifest (`app.json`) parsing and validation.
//!
//! The manifest declares the app's identity, its entry-point source
//! file, and the API version range it needs from the host. Validation
//! patches a missing or malformed id with a fresh UUID v4 and enforces
//! the version range against an explicitly injected host version, so
//! compatibility checks stay deterministic under test.

use std::collections::BTreeMap;
use thiserror::Error;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::diagnostics::ParseWarning;

/// The manifest filename at the archive root.
pub const MANIFEST_FILE: &str = "app.json";

/// Errors that can occur when validating a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest entry is not valid JSON for the expected shape.
    #[error("the \"{MANIFEST_FILE}\" file is not valid json: {0}")]
    Parse(#[from] serde_json::Error),

    /// The declared required API version is not a parseable range.
    #[error("app '{name}' declares an invalid required API version '{range}': {reason}")]
    InvalidVersionRange {
        name: String,
        range: String,
        reason: String,
    },

    /// The host's API version does not satisfy the declared range.
    #[error(
        "app '{name}' ({id}) requires API version '{required}' \
         but the host provides '{host}'"
    )]
    IncompatibleVersion {
        name: String,
        id: String,
        required: String,
        host: Version,
    },
}

/// The parsed `app.json` manifest.
///
/// Immutable after validation, apart from the id patch applied during
/// validation itself and the icon content attached at the end of
/// ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    /// App identity; always a UUID v4 after validation.
    #[serde(default)]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Archive path of the entry-point source file.
    pub class_file: String,

    /// Archive path of the declared icon, if any.
    #[serde(default)]
    pub icon_file: Option<String>,

    /// Semantic version range the host API must satisfy.
    pub required_api_version: String,

    /// Base64-encoded icon bytes, attached by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_file_content: Option<String>,

    /// Any further metadata the app chose to declare.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Validates raw manifest bytes against a fixed host API version.
#[derive(Debug, Clone)]
pub struct ManifestValidator {
    host_version: Version,
}

impl ManifestValidator {
    /// Create a validator for the given host API version.
    #[must_use]
    pub fn new(host_version: Version) -> Self {
        Self { host_version }
    }

    /// The host API version this validator enforces.
    #[must_use]
    pub fn host_version(&self) -> &Version {
        &self.host_version
    }

    /// Parse and validate raw manifest bytes.
    ///
    /// A missing or malformed id is replaced with a fresh UUID v4 and
    /// reported as a warning rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid manifest JSON or the
    /// declared API version range is invalid or unsatisfied.
    pub fn validate(
        &self,
        bytes: &[u8],
    ) -> Result<(AppManifest, Vec<ParseWarning>), ManifestError> {
        let mut manifest: AppManifest = serde_json::from_slice(bytes)?;
        let mut warnings = Vec::new();

        if !is_uuid_v4(&manifest.id) {
            manifest.id = Uuid::new_v4().to_string();
            warnings.push(ParseWarning::GeneratedAppId {
                name: manifest.name.clone(),
            });
        }

        let required = VersionReq::parse(&manifest.required_api_version).map_err(|err| {
            ManifestError::InvalidVersionRange {
                name: manifest.name.clone(),
                range: manifest.required_api_version.clone(),
                reason: err.to_string(),
            }
        })?;

        if !required.matches(&self.host_version) {
            return Err(ManifestError::IncompatibleVersion {
                name: manifest.name.clone(),
                id: manifest.id.clone(),
                required: manifest.required_api_version.clone(),
                host: self.host_version.clone(),
            });
        }

        Ok((manifest, warnings))
    }
}

/// Whether the string is a canonical hyphenated UUID v4.
///
/// `Uuid::try_parse` also accepts the simple, braced, and urn text
/// forms; those must not pass, or a non-canonical id would be kept as
/// the app's identity.
fn is_uuid_v4(id: &str) -> bool {
    Uuid::try_parse(id).is_ok_and(|uuid| {
        uuid.get_version_num() == 4 && uuid.hyphenated().to_string().eq_ignore_ascii_case(id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(host: &str) -> ManifestValidator {
        ManifestValidator::new(Version::parse(host).unwrap())
    }

    fn manifest_json(id: &str, required: &str) -> String {
        format!(
            r#"{{
                "id": "{id}",
                "name": "Todo Helper",
                "classFile": "main.ts",
                "requiredApiVersion": "{required}"
            }}"#
        )
    }

    #[test]
    fn preserves_well_formed_id() {
        let id = "3c384abe-2c13-4d85-b167-33a957ac9f7d";
        let (manifest, warnings) = validator("1.0.0")
            .validate(manifest_json(id, ">=1.0.0").as_bytes())
            .unwrap();

        assert_eq!(manifest.id, id);
        assert!(warnings.is_empty());
    }

    #[test]
    fn patches_malformed_id() {
        let (manifest, warnings) = validator("1.0.0")
            .validate(manifest_json("not-a-uuid", ">=1.0.0").as_bytes())
            .unwrap();

        assert!(is_uuid_v4(&manifest.id));
        assert_eq!(
            warnings,
            vec![ParseWarning::GeneratedAppId {
                name: "Todo Helper".to_string()
            }]
        );
    }

    #[test]
    fn patches_missing_id() {
        let json = r#"{
            "name": "Todo Helper",
            "classFile": "main.ts",
            "requiredApiVersion": ">=1.0.0"
        }"#;
        let (manifest, warnings) = validator("1.0.0").validate(json.as_bytes()).unwrap();

        assert!(is_uuid_v4(&manifest.id));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn rejects_uuid_of_wrong_version() {
        // Well-formed UUID, but v1.
        let (manifest, warnings) = validator("1.0.0")
            .validate(manifest_json("f47ac10b-58cc-1372-a567-0e02b2c3d479", ">=1.0.0").as_bytes())
            .unwrap();

        assert_ne!(manifest.id, "f47ac10b-58cc-1372-a567-0e02b2c3d479");
        assert!(is_uuid_v4(&manifest.id));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn patches_non_canonical_uuid_forms() {
        // Same value as the canonical id, in the other text forms the
        // uuid crate can parse.
        for id in [
            "3c384abe2c134d85b16733a957ac9f7d",
            "{3c384abe-2c13-4d85-b167-33a957ac9f7d}",
            "urn:uuid:3c384abe-2c13-4d85-b167-33a957ac9f7d",
        ] {
            let (manifest, warnings) = validator("1.0.0")
                .validate(manifest_json(id, ">=1.0.0").as_bytes())
                .unwrap();

            assert_ne!(manifest.id, id);
            assert!(is_uuid_v4(&manifest.id));
            assert_eq!(warnings.len(), 1);
        }
    }

    #[test]
    fn accepts_uppercase_hyphenated_id() {
        let id = "3C384ABE-2C13-4D85-B167-33A957AC9F7D";
        let (manifest, warnings) = validator("1.0.0")
            .validate(manifest_json(id, ">=1.0.0").as_bytes())
            .unwrap();

        assert_eq!(manifest.id, id);
        assert!(warnings.is_empty());
    }

    #[test]
    fn incompatible_host_version_fails() {
        let err = validator("1.5.0")
            .validate(manifest_json("3c384abe-2c13-4d85-b167-33a957ac9f7d", ">=2.0.0").as_bytes())
            .unwrap_err();

        match err {
            ManifestError::IncompatibleVersion { required, host, .. } => {
                assert_eq!(required, ">=2.0.0");
                assert_eq!(host, Version::parse("1.5.0").unwrap());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn compatible_host_version_passes() {
        let result = validator("2.3.0")
            .validate(manifest_json("3c384abe-2c13-4d85-b167-33a957ac9f7d", ">=2.0.0").as_bytes());
        assert!(result.is_ok());
    }

    #[test]
    fn malformed_json_fails() {
        let err = validator("1.0.0").validate(b"{not json").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn malformed_version_range_fails() {
        let err = validator("1.0.0")
            .validate(
                manifest_json("3c384abe-2c13-4d85-b167-33a957ac9f7d", "not a range").as_bytes(),
            )
            .unwrap_err();
        assert!(matches!(err, ManifestError::InvalidVersionRange { .. }));
    }

    #[test]
    fn extra_metadata_is_kept() {
        let json = r#"{
            "id": "3c384abe-2c13-4d85-b167-33a957ac9f7d",
            "name": "Todo Helper",
            "classFile": "main.ts",
            "requiredApiVersion": ">=1.0.0",
            "version": "0.2.1",
            "author": {"name": "Dev", "support": "dev@example.com"}
        }"#;
        let (manifest, _) = validator("1.0.0").validate(json.as_bytes()).unwrap();

        assert_eq!(
            manifest.extra.get("version"),
            Some(&Value::String("0.2.1".to_string()))
        );
        assert!(manifest.extra.contains_key("author"));
    }
}
