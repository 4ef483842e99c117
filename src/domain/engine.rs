// Rewrite driver for one translation unit: a single pre-order pass offering
// every node to every enabled rule, then the deferred driver synthesis.

use tracing::debug;

use crate::domain::ast::{SyntaxNode, TranslationUnit};
use crate::domain::config::InstrumentConfig;
use crate::domain::context::{RewriteContext, RewriteOutput};
use crate::domain::error::RewriteResult;
use crate::domain::rules::Rule;

/// Plan every edit for `unit`. Nothing is written; the caller commits the
/// returned edit set.
pub fn rewrite_unit(unit: &TranslationUnit, config: &InstrumentConfig) -> RewriteResult<RewriteOutput> {
    let path = unit.primary_path().unwrap_or("<unknown>");
    let rules = Rule::for_profile(config.profile);
    let mut ctx = RewriteContext::new(config, path);

    visit(&unit.root, &rules, &mut ctx)?;

    debug!(
        file = path,
        nodes = unit.root.count(),
        globals = ctx.ledger.len(),
        edits = ctx.edits.len(),
        "traversal done"
    );
    ctx.finish()
}

fn visit(node: &SyntaxNode, rules: &[Rule], ctx: &mut RewriteContext<'_>) -> RewriteResult<()> {
    for rule in rules {
        rule.apply(node, ctx)?;
    }
    for child in &node.children {
        visit(child, rules, ctx)?;
    }
    Ok(())
}
