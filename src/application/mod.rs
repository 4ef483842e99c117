use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dashmap::DashMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::config::InstrumentConfig;
use crate::domain::context::RewriteSummary;
use crate::domain::engine::rewrite_unit;
use crate::ports::{EditSink, FrontEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Rewritten,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RewriteSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one run over many translation units, sorted by path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.status == FileStatus::Failed)
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn get(&self, path: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run report {}", path.display()))
    }
}

pub struct InstrumentUsecase<'a> {
    pub front_end: &'a dyn FrontEnd,
    pub sink: &'a dyn EditSink,
    pub config: &'a InstrumentConfig,
}

impl FileReport {
    fn rewritten(path: String, summary: RewriteSummary) -> Self {
        Self {
            path,
            status: FileStatus::Rewritten,
            summary: Some(summary),
            error: None,
        }
    }

    fn failed(path: String, error: String) -> Self {
        Self {
            path,
            status: FileStatus::Failed,
            summary: None,
            error: Some(error),
        }
    }
}

impl<'a> InstrumentUsecase<'a> {
    /// Rewrite every source in parallel. A failing file is reported and
    /// skipped; the others are still committed. Repeated sources run once,
    /// and a source whose output file is already claimed by an earlier one
    /// fails without being written.
    pub fn run(&self, sources: &[PathBuf]) -> RunReport {
        let outcomes: DashMap<String, FileReport> = DashMap::new();
        let runnable = self.schedule(sources, &outcomes);

        runnable.par_iter().for_each(|source| {
            let path = source.display().to_string();
            let report = match self.process(source) {
                Ok(summary) => {
                    info!(file = %path, edits = summary.edits, globals = summary.captured.len(), "instrumented");
                    FileReport::rewritten(path.clone(), summary)
                }
                Err(e) => {
                    error!(file = %path, "{:#}", e);
                    FileReport::failed(path.clone(), format!("{:#}", e))
                }
            };
            outcomes.insert(path, report);
        });

        let mut files: Vec<FileReport> = outcomes.into_iter().map(|(_, r)| r).collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        RunReport { files }
    }

    /// Drop repeated sources and reject output collisions, in input order.
    fn schedule<'s>(
        &self,
        sources: &'s [PathBuf],
        outcomes: &DashMap<String, FileReport>,
    ) -> Vec<&'s PathBuf> {
        let mut seen: HashSet<&Path> = HashSet::new();
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        let mut runnable = Vec::new();

        for source in sources {
            if !seen.insert(source.as_path()) {
                warn!(file = %source.display(), "source listed more than once, processing it once");
                continue;
            }
            if let Some(target) = self.sink.target(source) {
                if let Some(first) = claimed.get(&target) {
                    let message = format!(
                        "Output {} is already written for {}",
                        target.display(),
                        first.display()
                    );
                    error!(file = %source.display(), "{}", message);
                    let path = source.display().to_string();
                    outcomes.insert(path.clone(), FileReport::failed(path, message));
                    continue;
                }
                claimed.insert(target, source.as_path());
            }
            runnable.push(source);
        }
        runnable
    }

    fn process(&self, source: &Path) -> Result<RewriteSummary> {
        let unit = self.front_end.load(source)?;
        let output = rewrite_unit(&unit, self.config)
            .with_context(|| format!("Cannot instrument {}", source.display()))?;
        self.sink.commit(&output.edits)?;
        Ok(output.summary())
    }
}
