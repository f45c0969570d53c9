//! Non-fatal advisories raised during package ingestion.
//!
//! Ingestion never logs; anything worth telling the installer about but
//! not worth failing over is returned alongside the result so the
//! caller can decide how to surface it.

use std::fmt;

/// A non-fatal condition noticed while parsing a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// The manifest id was missing or not shaped like a UUID v4, so a
    /// fresh one was generated. The same app can end up installed
    /// several times under different identities.
    GeneratedAppId {
        /// Declared app name, for the installer's message.
        name: String,
    },

    /// A localization file could not be parsed as JSON and was skipped.
    SkippedLanguageFile {
        /// Archive path of the skipped file.
        path: String,
        /// Parse failure detail.
        reason: String,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeneratedAppId { name } => write!(
                f,
                "generated a new id for '{name}' because it did not provide a valid one; \
                 the same app can be installed several times"
            ),
            Self::SkippedLanguageFile { path, reason } => {
                write!(f, "skipped localization file '{path}': {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages_name_the_subject() {
        let warning = ParseWarning::GeneratedAppId {
            name: "Todo Helper".to_string(),
        };
        assert!(warning.to_string().contains("Todo Helper"));

        let warning = ParseWarning::SkippedLanguageFile {
            path: "i18n/en.json".to_string(),
            reason: "expected value at line 1".to_string(),
        };
        assert!(warning.to_string().contains("i18n/en.json"));
    }
}
