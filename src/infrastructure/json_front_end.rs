//! Front-end adapter for serialized syntax trees.
//!
//! A compiler plugin dumps each translation unit as JSON next to the source
//! (`foo.cpp` -> `foo.cpp.ast.json`), or into a separate dump directory.
//! This adapter only deserializes; it never looks at the source text.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::domain::ast::TranslationUnit;
use crate::ports::FrontEnd;

pub const DUMP_EXTENSION: &str = "ast.json";

#[derive(Debug, Clone, Default)]
pub struct JsonFrontEnd {
    dump_dir: Option<PathBuf>,
}

impl JsonFrontEnd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for dumps in `dir` instead of next to the sources.
    pub fn with_dump_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dump_dir: Some(dir.into()) }
    }

    pub fn dump_path(&self, source: &Path) -> PathBuf {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let dump_name = format!("{}.{}", file_name, DUMP_EXTENSION);
        match &self.dump_dir {
            Some(dir) => dir.join(dump_name),
            None => source.with_file_name(dump_name),
        }
    }

    pub fn parse(content: &str, source: &Path) -> Result<TranslationUnit> {
        let mut unit: TranslationUnit = serde_json::from_str(content)
            .with_context(|| format!("Malformed syntax tree dump for {}", source.display()))?;
        if unit.files.is_empty() {
            bail!("Syntax tree dump for {} has an empty file table", source.display());
        }
        // The dump may carry a compiler-relative path; edits must land on
        // the file we were asked to process.
        unit.files[0] = source.display().to_string();
        Ok(unit)
    }
}

impl FrontEnd for JsonFrontEnd {
    fn load(&self, source: &Path) -> Result<TranslationUnit> {
        let dump = self.dump_path(source);
        let content = fs::read_to_string(&dump)
            .with_context(|| format!("Failed to read syntax tree dump {}", dump.display()))?;
        Self::parse(&content, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::NodeKind;
    use tempfile::tempdir;

    const DUMP: &str = r#"{
        "files": ["build/../main.c", "/usr/include/stdio.h"],
        "root": {
            "kind": {"type": "translation_unit"},
            "range": {"begin": 0, "end": 10},
            "children": [
                {"kind": {"type": "compound_stmt"}, "range": {"begin": 0, "end": 2}, "file": 1}
            ]
        }
    }"#;

    #[test]
    fn test_dump_path_next_to_source() {
        let fe = JsonFrontEnd::new();
        assert_eq!(fe.dump_path(Path::new("src/main.c")), PathBuf::from("src/main.c.ast.json"));
        let fe = JsonFrontEnd::with_dump_dir("/tmp/dumps");
        assert_eq!(fe.dump_path(Path::new("src/main.c")), PathBuf::from("/tmp/dumps/main.c.ast.json"));
    }

    #[test]
    fn test_load_replaces_primary_path() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("main.c");
        fs::write(&source, "int main() {}").unwrap();
        fs::write(dir.path().join("main.c.ast.json"), DUMP).unwrap();

        let unit = JsonFrontEnd::new().load(&source).unwrap();
        assert_eq!(unit.primary_path(), Some(source.display().to_string().as_str()));
        assert_eq!(unit.files.len(), 2);
        assert!(matches!(unit.root.kind, NodeKind::TranslationUnit));
        assert!(matches!(unit.root.children[0].kind, NodeKind::Other));
    }

    #[test]
    fn test_missing_dump() {
        let dir = tempdir().unwrap();
        let err = JsonFrontEnd::new().load(&dir.path().join("absent.c")).unwrap_err();
        assert!(err.to_string().contains("Failed to read syntax tree dump"));
    }

    #[test]
    fn test_empty_file_table() {
        let json = r#"{"files": [], "root": {"kind": {"type": "translation_unit"}, "range": {"begin": 0, "end": 0}}}"#;
        assert!(JsonFrontEnd::parse(json, Path::new("a.c")).is_err());
    }
}
