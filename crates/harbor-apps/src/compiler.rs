//! The compiler capability consumed by the ingestion pipeline.
//!
//! Compilation itself lives in the host. The pipeline hands over the
//! validated manifest and the collected source set, and gets back a new
//! set with compiled output attached. Taking the set by value and
//! returning a fresh one keeps the pipeline stages free of aliasing;
//! nothing is patched in place.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::manifest::AppManifest;
use crate::sources::SourceFile;

/// Opaque error reported by a compiler implementation.
///
/// The pipeline forwards it unchanged; it carries whatever message the
/// compiler chose to produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CompilerError {
    message: String,
}

impl CompilerError {
    /// Wrap a compiler-defined failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The compiler's failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Compiles an app's collected sources to executable output.
///
/// The only asynchronous stage of ingestion; implementations may
/// suspend and are responsible for bounding their own runtime.
#[allow(async_fn_in_trait)]
pub trait AppCompiler {
    /// Compile every collected source file.
    ///
    /// Returns the same set of files with `compiled` populated.
    ///
    /// # Errors
    ///
    /// Returns a compiler-defined error, propagated unchanged by the
    /// pipeline.
    async fn compile(
        &self,
        manifest: &AppManifest,
        sources: BTreeMap<String, SourceFile>,
    ) -> Result<BTreeMap<String, SourceFile>, CompilerError>;
}
