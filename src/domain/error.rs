//! Errors raised while rewriting a single translation unit.
//!
//! Every variant is fatal for the file it was raised in and for nothing
//! else. Ineligible types and nodes from included files are not errors; the
//! rules skip them.

use thiserror::Error;

use crate::domain::ast::SourceRange;
use crate::domain::edit::Edit;

pub type RewriteResult<T> = Result<T, RewriteError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// A construct the rules cannot rewrite without changing its meaning.
    #[error("{construct} at {range} is not supported")]
    UnsupportedConstruct {
        construct: &'static str,
        range: SourceRange,
    },

    /// Two edits touch overlapping bytes of the same file.
    #[error("conflicting edits: {existing} overlaps {incoming}")]
    EditConflict { existing: Edit, incoming: Edit },

    /// An edit whose range ends before it begins.
    #[error("edit range {range} ends before it begins")]
    InvalidRange { range: SourceRange },

    /// An edit points past the end of the source it is applied to.
    #[error("edit range {range} is outside a source of {len} bytes")]
    RangeOutOfBounds { range: SourceRange, len: usize },
}
