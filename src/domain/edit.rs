//! Edits and the per-file edit set.
//!
//! Rules never touch source text directly. They describe what should change
//! as `Edit`s, and the `EditSet` guarantees that no two of them overlap
//! before anything is committed.

use serde::Serialize;

use crate::domain::ast::SourceRange;
use crate::domain::error::{RewriteError, RewriteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Point insertion in front of a token range.
    InsertBefore,
    /// Point insertion right after a token range.
    InsertAfter,
    /// Replace a range wholesale.
    ReplaceRange,
    /// Replace a single identifier token.
    RenameToken,
}

impl EditKind {
    pub fn name(&self) -> &'static str {
        match self {
            EditKind::InsertBefore => "insert-before",
            EditKind::InsertAfter => "insert-after",
            EditKind::ReplaceRange => "replace",
            EditKind::RenameToken => "rename",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            EditKind::InsertAfter => 0,
            EditKind::InsertBefore => 1,
            EditKind::ReplaceRange | EditKind::RenameToken => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub range: SourceRange,
    pub kind: EditKind,
    pub text: String,
}

impl Edit {
    pub fn insert_before(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: SourceRange::point(offset),
            kind: EditKind::InsertBefore,
            text: text.into(),
        }
    }

    pub fn insert_after(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: SourceRange::point(offset),
            kind: EditKind::InsertAfter,
            text: text.into(),
        }
    }

    pub fn replace(range: SourceRange, text: impl Into<String>) -> Self {
        Self {
            range,
            kind: EditKind::ReplaceRange,
            text: text.into(),
        }
    }

    pub fn rename(range: SourceRange, text: impl Into<String>) -> Self {
        Self {
            range,
            kind: EditKind::RenameToken,
            text: text.into(),
        }
    }

    pub fn conflicts_with(&self, other: &Edit) -> bool {
        self.range.overlaps(&other.range)
    }
}

impl std::fmt::Display for Edit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {:?}", self.kind.name(), self.range, self.text)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    edit: Edit,
    // Tie-breaker for edits sharing an offset: lower goes first.
    seq: u64,
}

/// All edits planned for one file. Ranges are pairwise disjoint; two point
/// insertions at the same offset are kept in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    path: String,
    entries: Vec<Entry>,
    next_seq: u64,
}

impl EditSet {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an edit. An exact duplicate of an existing edit is dropped; an
    /// edit overlapping any other is rejected.
    pub fn insert(&mut self, edit: Edit) -> RewriteResult<()> {
        let seq = self.next_seq;
        if self.push(edit, seq)? {
            self.next_seq += 1;
        }
        Ok(())
    }

    /// Add an edit that must precede every other edit of its kind at the
    /// same offset.
    pub fn insert_leading(&mut self, edit: Edit) -> RewriteResult<()> {
        self.push(edit, 0).map(|_| ())
    }

    fn push(&mut self, edit: Edit, seq: u64) -> RewriteResult<bool> {
        if edit.range.begin > edit.range.end {
            return Err(RewriteError::InvalidRange { range: edit.range });
        }
        if self.entries.iter().any(|e| e.edit == edit) {
            tracing::trace!(%edit, "dropping duplicate edit");
            return Ok(false);
        }
        if let Some(existing) = self.entries.iter().find(|e| e.edit.conflicts_with(&edit)) {
            return Err(RewriteError::EditConflict {
                existing: existing.edit.clone(),
                incoming: edit,
            });
        }
        self.entries.push(Entry { edit, seq });
        Ok(true)
    }

    /// Edits in application order: by offset, then `InsertAfter` (it closes
    /// the token to its left), then `InsertBefore`, then replacements. Edits
    /// of the same kind at one offset keep the order they were added in.
    pub fn edits(&self) -> Vec<&Edit> {
        let mut sorted: Vec<&Entry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| (e.edit.range.begin, e.edit.kind.rank(), e.seq));
        sorted.into_iter().map(|e| &e.edit).collect()
    }

    /// Produce the rewritten text of `source`.
    pub fn apply(&self, source: &str) -> RewriteResult<String> {
        let mut out = String::with_capacity(source.len() + self.text_len());
        let mut cursor = 0;
        for edit in self.edits() {
            let range = edit.range;
            let kept = source
                .get(cursor..range.begin)
                .ok_or(RewriteError::RangeOutOfBounds { range, len: source.len() })?;
            if range.end > source.len() || !source.is_char_boundary(range.end) {
                return Err(RewriteError::RangeOutOfBounds { range, len: source.len() });
            }
            out.push_str(kept);
            out.push_str(&edit.text);
            cursor = range.end;
        }
        out.push_str(&source[cursor..]);
        Ok(out)
    }

    fn text_len(&self) -> usize {
        self.entries.iter().map(|e| e.edit.text.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_with_point_insertions() {
        let src = "if (x > 0) y = 1;";
        let mut set = EditSet::new("a.c");
        set.insert(Edit::insert_before(4, "branch(")).unwrap();
        set.insert(Edit::insert_after(9, ")")).unwrap();
        assert_eq!(set.apply(src).unwrap(), "if (branch(x > 0)) y = 1;");
    }

    #[test]
    fn test_overlapping_replacements_conflict() {
        let mut set = EditSet::new("a.c");
        set.insert(Edit::replace(SourceRange::new(0, 10), "a")).unwrap();
        let err = set.insert(Edit::rename(SourceRange::new(5, 12), "b")).unwrap_err();
        match err {
            RewriteError::EditConflict { existing, incoming } => {
                assert_eq!(existing.range, SourceRange::new(0, 10));
                assert_eq!(incoming.range, SourceRange::new(5, 12));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_point_inside_replacement_conflicts() {
        let mut set = EditSet::new("a.c");
        set.insert(Edit::replace(SourceRange::new(0, 10), "a")).unwrap();
        assert!(set.insert(Edit::insert_before(3, "x")).is_err());
        // Boundaries are fine.
        set.insert(Edit::insert_before(0, "<")).unwrap();
        set.insert(Edit::insert_after(10, ">")).unwrap();
    }

    #[test]
    fn test_duplicate_edit_is_merged() {
        let mut set = EditSet::new("a.c");
        set.insert(Edit::insert_before(0, "crv::Internal<")).unwrap();
        set.insert(Edit::insert_before(0, "crv::Internal<")).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_same_offset_keeps_insertion_order() {
        let src = "i++";
        let mut set = EditSet::new("a.c");
        set.insert(Edit::insert_before(0, "branch(")).unwrap();
        set.insert(Edit::insert_before(0, "post_increment(")).unwrap();
        set.insert(Edit::replace(SourceRange::new(1, 3), ")")).unwrap();
        set.insert(Edit::insert_after(3, ")")).unwrap();
        assert_eq!(set.apply(src).unwrap(), "branch(post_increment(i))");
    }

    #[test]
    fn test_insert_after_closes_before_next_opens() {
        // "{int x" : a block is opened after `{` once the wrap of `int` is
        // already planned, and must not end up inside it.
        let src = "{int x";
        let mut set = EditSet::new("a.c");
        set.insert(Edit::insert_before(1, "W<")).unwrap();
        set.insert(Edit::insert_after(4, ">")).unwrap();
        set.insert(Edit::insert_after(1, "\nblock;\n")).unwrap();
        assert_eq!(set.apply(src).unwrap(), "{\nblock;\nW<int> x");
    }

    #[test]
    fn test_reversed_range_rejected() {
        let mut set = EditSet::new("a.c");
        let err = set.insert(Edit::replace(SourceRange::new(8, 3), "x")).unwrap_err();
        assert_eq!(err, RewriteError::InvalidRange { range: SourceRange::new(8, 3) });
        assert!(set.is_empty());
    }

    #[test]
    fn test_leading_edit_goes_first() {
        let src = "int g;";
        let mut set = EditSet::new("a.c");
        set.insert(Edit::insert_before(0, "crv::Internal<")).unwrap();
        set.insert(Edit::insert_after(3, ">")).unwrap();
        set.insert_leading(Edit::insert_before(0, "#include <crv.h>\n")).unwrap();
        assert_eq!(set.apply(src).unwrap(), "#include <crv.h>\ncrv::Internal<int> g;");
    }

    #[test]
    fn test_out_of_bounds() {
        let mut set = EditSet::new("a.c");
        set.insert(Edit::replace(SourceRange::new(2, 40), "x")).unwrap();
        assert!(matches!(
            set.apply("short"),
            Err(RewriteError::RangeOutOfBounds { len: 5, .. })
        ));
    }
}
