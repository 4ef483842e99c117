use std::path::{Path, PathBuf};

use crate::domain::ast::TranslationUnit;
use crate::domain::edit::EditSet;

/// Produces the syntax tree of one source file.
/// Implementations must be thread-safe: files are loaded in parallel.
pub trait FrontEnd: Send + Sync {
    fn load(&self, source: &Path) -> anyhow::Result<TranslationUnit>;
}

/// Commits a finished edit set. Called once per file, after traversal.
pub trait EditSink: Send + Sync {
    fn commit(&self, edits: &EditSet) -> anyhow::Result<()>;

    /// File the instrumented `source` ends up in, for sinks that write files.
    /// Two sources sharing a target are not committed concurrently.
    fn target(&self, _source: &Path) -> Option<PathBuf> {
        None
    }
}
