// Per-translation-unit rewrite state.
// One context is built for each file and dropped with it; nothing in here is
// shared across files.

use serde::Serialize;

use crate::domain::ast::{FileId, FunctionDecl, SyntaxNode};
use crate::domain::config::InstrumentConfig;
use crate::domain::driver::{EntryPoint, EntryPointState};
use crate::domain::edit::{Edit, EditSet};
use crate::domain::error::RewriteResult;
use crate::domain::ledger::{CaptureLedger, CaptureRecord};
use crate::domain::template::Templates;

pub struct RewriteContext<'a> {
    pub config: &'a InstrumentConfig,
    pub templates: Templates,
    primary: FileId,
    pub ledger: CaptureLedger,
    pub edits: EditSet,
    entry_points: Vec<EntryPoint>,
}

/// What a finished context hands back.
#[derive(Debug, Clone)]
pub struct RewriteOutput {
    pub edits: EditSet,
    pub captured: Vec<CaptureRecord>,
    pub entry_points: Vec<EntryPointState>,
}

/// Counts reported for a rewritten file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteSummary {
    pub edits: usize,
    pub captured: Vec<String>,
    pub entry_points: Vec<EntryPointState>,
}

impl RewriteOutput {
    pub fn summary(&self) -> RewriteSummary {
        RewriteSummary {
            edits: self.edits.len(),
            captured: self.captured.iter().map(|r| r.name.clone()).collect(),
            entry_points: self.entry_points.clone(),
        }
    }
}

impl<'a> RewriteContext<'a> {
    pub fn new(config: &'a InstrumentConfig, path: &str) -> Self {
        Self {
            config,
            templates: Templates::new(config),
            primary: FileId::PRIMARY,
            ledger: CaptureLedger::new(),
            edits: EditSet::new(path),
            entry_points: Vec::new(),
        }
    }

    /// Visibility filter: only nodes from the primary file are rewritten.
    pub fn is_visible(&self, node: &SyntaxNode) -> bool {
        node.file == self.primary
    }

    pub fn edit(&mut self, edit: Edit) -> RewriteResult<()> {
        self.edits.insert(edit)
    }

    /// Rename the entry point now, keep it around for the driver.
    pub fn enter_entry_point(&mut self, decl: &FunctionDecl) -> RewriteResult<()> {
        let mut entry = EntryPoint::found(decl);
        entry.rename(&mut self.edits)?;
        self.entry_points.push(entry);
        Ok(())
    }

    /// End of traversal: the ledger is final, so pending drivers can be
    /// synthesized.
    pub fn finish(self) -> RewriteResult<RewriteOutput> {
        let RewriteContext {
            config,
            templates,
            ledger,
            mut edits,
            mut entry_points,
            ..
        } = self;

        let captured = ledger.into_ordered();
        for entry in &mut entry_points {
            entry.synthesize(&templates, &captured, &mut edits)?;
        }

        if let Some(header) = &config.runtime_header {
            if !edits.is_empty() {
                edits.insert_leading(Edit::insert_before(0, templates.runtime_include(header)))?;
            }
        }

        Ok(RewriteOutput {
            edits,
            captured,
            entry_points: entry_points.iter().map(EntryPoint::state).collect(),
        })
    }
}
