use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::json;

use crate::domain::edit::EditSet;
use crate::ports::EditSink;

/// Writes instrumented sources to disk, in place or into `output_dir`.
/// Under `output_dir` the source path is mirrored, minus root, prefix and
/// `..` components: `src/a/x.c` lands in `out/src/a/x.c`.
/// Each file is written to a temporary sibling and renamed over the target,
/// so a failed run never leaves a half-written source behind.
#[derive(Debug, Clone, Default)]
pub struct FsEditSink {
    output_dir: Option<PathBuf>,
}

impl FsEditSink {
    pub fn in_place() -> Self {
        Self { output_dir: None }
    }

    pub fn into_dir(dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: Some(dir.into()) }
    }

    fn target_for(&self, source: &Path) -> Result<PathBuf> {
        let Some(dir) = &self.output_dir else {
            return Ok(source.to_path_buf());
        };
        let relative: PathBuf = source
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        if relative.file_name().is_none() {
            bail!("Source path has no file name: {}", source.display());
        }
        Ok(dir.join(relative))
    }
}

impl EditSink for FsEditSink {
    fn commit(&self, edits: &EditSet) -> Result<()> {
        let source = Path::new(edits.path());
        if edits.is_empty() && self.output_dir.is_none() {
            return Ok(());
        }

        let original = fs::read_to_string(source)
            .with_context(|| format!("Failed to read source {}", source.display()))?;
        let rewritten = edits
            .apply(&original)
            .with_context(|| format!("Failed to apply edits to {}", source.display()))?;

        let target = self.target_for(source)?;
        write_atomically(&target, &rewritten)?;
        tracing::debug!(target = %target.display(), edits = edits.len(), "committed");
        Ok(())
    }

    fn target(&self, source: &Path) -> Option<PathBuf> {
        self.target_for(source).ok()
    }
}

fn write_atomically(target: &Path, content: &str) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .context("Failed to write instrumented source")?;
    tmp.as_file().sync_all().context("Failed to flush instrumented source")?;
    tmp.persist(target)
        .with_context(|| format!("Failed to replace {}", target.display()))?;
    Ok(())
}

/// Prints the planned edits as one JSON line per file instead of writing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

impl DryRunSink {
    pub fn render(edits: &EditSet) -> Result<String> {
        let value = json!({
            "file": edits.path(),
            "edits": edits.edits(),
        });
        Ok(serde_json::to_string(&value)?)
    }
}

impl EditSink for DryRunSink {
    fn commit(&self, edits: &EditSet) -> Result<()> {
        println!("{}", Self::render(edits)?);
        Ok(())
    }
}
