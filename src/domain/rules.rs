//! The rewrite rule catalogue.
//!
//! Each rule pairs a structural pattern with its guards (visibility and
//! eligibility) and the edits it produces. The set is closed: adding a rule
//! means adding a variant and handling it in `Rule::apply`.

use tracing::debug;

use crate::domain::ast::{
    CallExpr, Conditional, FunctionDecl, NodeKind, SourceRange, StorageClass, SyntaxNode,
    UnaryExpr, UnaryOpcode, VarDecl,
};
use crate::domain::config::Profile;
use crate::domain::context::RewriteContext;
use crate::domain::edit::Edit;
use crate::domain::error::{RewriteError, RewriteResult};
use crate::domain::ledger::CaptureRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    IfCondition,
    ForCondition,
    /// `while` and `do ... while`.
    WhileCondition,
    LocalVar,
    GlobalVar,
    Field,
    Parameter,
    ReturnType,
    PostIncrement,
    Assume,
    Assert,
    NondetInput,
    EntryPoint,
}

impl Rule {
    pub const ALL: [Rule; 13] = [
        Rule::IfCondition,
        Rule::ForCondition,
        Rule::WhileCondition,
        Rule::LocalVar,
        Rule::GlobalVar,
        Rule::Field,
        Rule::Parameter,
        Rule::ReturnType,
        Rule::PostIncrement,
        Rule::Assume,
        Rule::Assert,
        Rule::NondetInput,
        Rule::EntryPoint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::IfCondition => "if-condition",
            Rule::ForCondition => "for-condition",
            Rule::WhileCondition => "while-condition",
            Rule::LocalVar => "local-var",
            Rule::GlobalVar => "global-var",
            Rule::Field => "field",
            Rule::Parameter => "parameter",
            Rule::ReturnType => "return-type",
            Rule::PostIncrement => "post-increment",
            Rule::Assume => "assume",
            Rule::Assert => "assert",
            Rule::NondetInput => "nondet-input",
            Rule::EntryPoint => "entry-point",
        }
    }

    /// The tracing profile has no driver and no verifier intrinsics.
    pub fn enabled(&self, profile: Profile) -> bool {
        match profile {
            Profile::Nse => true,
            Profile::Crv => !matches!(
                self,
                Rule::Assume | Rule::Assert | Rule::NondetInput | Rule::EntryPoint
            ),
        }
    }

    pub fn for_profile(profile: Profile) -> Vec<Rule> {
        Rule::ALL.into_iter().filter(|r| r.enabled(profile)).collect()
    }

    /// Offer `node` to this rule. Nodes that don't match the pattern, or that
    /// fail a guard, produce no edits.
    pub fn apply(self, node: &SyntaxNode, ctx: &mut RewriteContext<'_>) -> RewriteResult<()> {
        match (self, &node.kind) {
            (Rule::IfCondition, NodeKind::If(cond)) => branch_condition(node, "if", cond, ctx),
            (Rule::ForCondition, NodeKind::For(cond)) => branch_condition(node, "for", cond, ctx),
            (Rule::WhileCondition, NodeKind::While(cond)) => {
                branch_condition(node, "while", cond, ctx)
            }
            (Rule::WhileCondition, NodeKind::Do(cond)) => branch_condition(node, "do", cond, ctx),
            (Rule::LocalVar, NodeKind::Var(decl)) if decl.storage == StorageClass::Automatic => {
                let open = ctx.templates.internal_open();
                declaration(self, node, decl, &open, ctx).map(|_| ())
            }
            (Rule::GlobalVar, NodeKind::Var(decl)) if decl.storage == StorageClass::Global => {
                let open = ctx.templates.global_open();
                if declaration(self, node, decl, &open, ctx)? && ctx.config.profile == Profile::Nse {
                    ctx.ledger.capture(CaptureRecord {
                        name: decl.name.clone(),
                        declared_type: decl.type_spelling.clone(),
                        supported: true,
                        offset: decl.declarator_range.begin,
                    });
                }
                Ok(())
            }
            (Rule::Field, NodeKind::Var(decl)) if decl.storage == StorageClass::Field => {
                let open = ctx.templates.internal_open();
                declaration(self, node, decl, &open, ctx).map(|_| ())
            }
            (Rule::Parameter, NodeKind::Var(decl)) if decl.storage == StorageClass::Parameter => {
                let open = ctx.templates.internal_open();
                declaration(self, node, decl, &open, ctx).map(|_| ())
            }
            (Rule::ReturnType, NodeKind::Function(func)) => return_type(node, func, ctx),
            (Rule::PostIncrement, NodeKind::Unary(expr)) => post_increment(node, expr, ctx),
            (Rule::Assume, NodeKind::Call(call)) => verifier_call(self, node, call, ctx),
            (Rule::Assert, NodeKind::Call(call)) => verifier_call(self, node, call, ctx),
            (Rule::NondetInput, NodeKind::Call(call)) => nondet_input(node, call, ctx),
            (Rule::EntryPoint, NodeKind::Function(func)) => {
                if ctx.config.is_entry_point(&func.name) && ctx.is_visible(node) {
                    debug!(name = %func.name, "renaming entry point");
                    ctx.enter_entry_point(func)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Wrap `range` as `open` + original text + `close` using two point
/// insertions, so the original text is never re-lexed.
fn wrap(ctx: &mut RewriteContext<'_>, range: SourceRange, open: &str, close: &str) -> RewriteResult<()> {
    ctx.edit(Edit::insert_before(range.begin, open))?;
    ctx.edit(Edit::insert_after(range.end, close))
}

fn branch_condition(
    node: &SyntaxNode,
    statement: &'static str,
    cond: &Conditional,
    ctx: &mut RewriteContext<'_>,
) -> RewriteResult<()> {
    if !ctx.is_visible(node) {
        return Ok(());
    }
    if let Some(range) = cond.condition_variable {
        return Err(RewriteError::UnsupportedConstruct {
            construct: condition_variable_construct(statement),
            range,
        });
    }
    let Some(range) = cond.condition else {
        return Ok(());
    };
    let open = ctx.templates.branch_open();
    wrap(ctx, range, &open, ")")
}

fn condition_variable_construct(statement: &str) -> &'static str {
    match statement {
        "if" => "condition variable in `if`",
        "for" => "condition variable in `for`",
        _ => "condition variable in `while`",
    }
}

/// Shared by the local, global, field and parameter rules. Returns whether
/// the declaration was rewritten.
fn declaration(
    rule: Rule,
    node: &SyntaxNode,
    decl: &VarDecl,
    open: &str,
    ctx: &mut RewriteContext<'_>,
) -> RewriteResult<bool> {
    if !ctx.is_visible(node) {
        return Ok(false);
    }
    let declared = decl.declared_type();
    if !declared.is_supported() {
        debug!(rule = rule.name(), name = %decl.name, ty = %decl.type_spelling, "unsupported type, skipping");
        return Ok(false);
    }

    if declared.is_array() {
        // Array syntax can't be wrapped around the element type, so the
        // declarator is rebuilt from the type spelling and the name.
        let text = ctx
            .templates
            .array_declarator(open, &decl.type_spelling, &decl.name);
        ctx.edit(Edit::replace(decl.declarator_range, text))?;
    } else {
        let close = ctx.templates.wrap_close();
        wrap(ctx, decl.type_range, open, close)?;
    }
    Ok(true)
}

fn return_type(node: &SyntaxNode, func: &FunctionDecl, ctx: &mut RewriteContext<'_>) -> RewriteResult<()> {
    // The entry point keeps its return type; the driver owns it.
    if ctx.config.is_entry_point(&func.name) || !ctx.is_visible(node) {
        return Ok(());
    }
    if !func.return_type.is_supported() {
        return Ok(());
    }
    let open = ctx.templates.internal_open();
    let close = ctx.templates.wrap_close();
    wrap(ctx, func.return_type_range, &open, close)
}

fn post_increment(node: &SyntaxNode, expr: &UnaryExpr, ctx: &mut RewriteContext<'_>) -> RewriteResult<()> {
    if expr.opcode != UnaryOpcode::PostInc || !ctx.is_visible(node) {
        return Ok(());
    }
    let open = ctx.templates.post_increment_open();
    ctx.edit(Edit::insert_before(expr.operand.begin, open))?;
    ctx.edit(Edit::replace(expr.operator, ")"))
}

fn verifier_call(rule: Rule, node: &SyntaxNode, call: &CallExpr, ctx: &mut RewriteContext<'_>) -> RewriteResult<()> {
    let Some(callee) = call.callee.as_deref() else {
        return Ok(());
    };
    let replacement = match rule {
        Rule::Assume if callee == ctx.config.assume_function => ctx.templates.assume_callee(),
        Rule::Assert if callee == ctx.config.assert_function => ctx.templates.assert_callee(),
        _ => return Ok(()),
    };
    if !ctx.is_visible(node) {
        return Ok(());
    }
    ctx.edit(Edit::rename(call.callee_range, replacement))
}

fn nondet_input(node: &SyntaxNode, call: &CallExpr, ctx: &mut RewriteContext<'_>) -> RewriteResult<()> {
    let is_nondet = call
        .callee
        .as_deref()
        .is_some_and(|name| ctx.config.nondet_pattern.matches(name));
    if !is_nondet || !ctx.is_visible(node) {
        return Ok(());
    }
    let replacement = ctx.templates.nondet_callee(&call.return_type);
    ctx.edit(Edit::replace(call.callee_range, replacement))
}
