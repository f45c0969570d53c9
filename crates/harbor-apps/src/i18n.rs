//! Assembly of per-language translation dictionaries.
//!
//! Localization is best-effort: a package with a broken translation
//! file still installs, the file is just skipped and reported. Files
//! for the same language code are merged in archive order, later keys
//! overwriting earlier ones.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::archive::ArchiveEntry;
use crate::diagnostics::ParseWarning;

/// Reserved localization directory at the archive root.
pub const I18N_DIR: &str = "i18n/";

/// Merged translation dictionaries keyed by lower-cased language code.
pub type LanguageContent = BTreeMap<String, Map<String, Value>>;

/// Collect and merge the package's localization files.
///
/// The language code is the lower-cased filename stem, so `i18n/en.json`
/// and `i18n/EN.json` both land under `en`. Unparseable files produce a
/// warning instead of failing the collection.
pub fn collect_languages(entries: &[ArchiveEntry]) -> (LanguageContent, Vec<ParseWarning>) {
    let mut languages = LanguageContent::new();
    let mut warnings = Vec::new();

    for entry in entries {
        if entry.is_dir || !entry.path.starts_with(I18N_DIR) || !entry.path.ends_with(".json") {
            continue;
        }

        let filename = entry.path.rsplit('/').next().unwrap_or(entry.path.as_str());
        let code = filename
            .split('.')
            .next()
            .unwrap_or(filename)
            .to_lowercase();

        match serde_json::from_slice::<Map<String, Value>>(&entry.data) {
            Ok(translations) => {
                languages.entry(code).or_default().extend(translations);
            }
            Err(err) => {
                warnings.push(ParseWarning::SkippedLanguageFile {
                    path: entry.path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    (languages, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> ArchiveEntry {
        ArchiveEntry {
            path: path.to_string(),
            is_dir: false,
            data: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn derives_language_code_from_filename_stem() {
        let entries = [file("i18n/pt-BR.json", r#"{"greeting": "olá"}"#)];
        let (languages, warnings) = collect_languages(&entries);

        assert!(warnings.is_empty());
        assert_eq!(languages["pt-br"]["greeting"], "olá");
    }

    #[test]
    fn merges_same_code_across_casings() {
        let entries = [
            file("i18n/en.json", r#"{"a": "1"}"#),
            file("i18n/EN.json", r#"{"b": "2"}"#),
        ];
        let (languages, _) = collect_languages(&entries);

        let en = &languages["en"];
        assert_eq!(en["a"], "1");
        assert_eq!(en["b"], "2");
    }

    #[test]
    fn later_entry_wins_on_key_collision() {
        let entries = [
            file("i18n/en.json", r#"{"a": "first"}"#),
            file("i18n/EN.json", r#"{"a": "second"}"#),
        ];
        let (languages, _) = collect_languages(&entries);

        assert_eq!(languages["en"]["a"], "second");
    }

    #[test]
    fn broken_file_is_skipped_with_warning() {
        let entries = [
            file("i18n/en.json", r#"{"a": "1"}"#),
            file("i18n/de.json", "{not json"),
        ];
        let (languages, warnings) = collect_languages(&entries);

        assert_eq!(languages.len(), 1);
        assert!(languages.contains_key("en"));
        assert!(matches!(
            warnings.as_slice(),
            [ParseWarning::SkippedLanguageFile { path, .. }] if path == "i18n/de.json"
        ));
    }

    #[test]
    fn ignores_entries_outside_the_reserved_directory() {
        let entries = [
            file("en.json", r#"{"a": "1"}"#),
            file("assets/i18n/en.json", r#"{"a": "1"}"#),
            file("i18n/notes.txt", "not json"),
        ];
        let (languages, warnings) = collect_languages(&entries);

        assert!(languages.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn nested_files_use_the_last_path_segment() {
        let entries = [file("i18n/extra/FR.json", r#"{"oui": "yes"}"#)];
        let (languages, _) = collect_languages(&entries);

        assert_eq!(languages["fr"]["oui"], "yes");
    }
}
