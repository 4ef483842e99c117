//! Text templates for everything the engine writes into a program.
//!
//! All generated call expressions are assembled here from the run
//! configuration, so the rules never concatenate names themselves.

use crate::domain::config::{InstrumentConfig, Profile};

/// Name the entry point is renamed to. The generated driver calls it.
pub const RENAMED_ENTRY_POINT: &str = "nse_main";

#[derive(Debug, Clone)]
pub struct Templates {
    namespace: String,
    strategy_expr: String,
    branch_call: String,
    profile: Profile,
}

impl Templates {
    pub fn new(config: &InstrumentConfig) -> Self {
        let namespace = config.namespace.clone();
        let strategy_expr = format!("{}::{}()", namespace, config.strategy);
        let branch_call = match config.profile {
            Profile::Nse => format!("{}.{}", strategy_expr, config.branch),
            Profile::Crv => format!("{}::tracer().decide_flip", namespace),
        };
        Self {
            namespace,
            strategy_expr,
            branch_call,
            profile: config.profile,
        }
    }

    /// `crv::sequential_dfs_checker()`
    pub fn strategy_expr(&self) -> &str {
        &self.strategy_expr
    }

    /// Opening text wrapped around a branch or loop condition.
    pub fn branch_open(&self) -> String {
        format!("{}(", self.branch_call)
    }

    /// `crv::Internal<`
    pub fn internal_open(&self) -> String {
        format!("{}::Internal<", self.namespace)
    }

    /// Global state wraps in `External` under the tracing profile.
    pub fn global_open(&self) -> String {
        match self.profile {
            Profile::Nse => self.internal_open(),
            Profile::Crv => format!("{}::External<", self.namespace),
        }
    }

    pub fn wrap_close(&self) -> &'static str {
        ">"
    }

    /// Replacement for an array declarator: `crv::Internal<int [4]> xs`.
    pub fn array_declarator(&self, open: &str, type_spelling: &str, name: &str) -> String {
        format!("{}{}> {}", open, type_spelling, name)
    }

    pub fn post_increment_open(&self) -> String {
        format!("{}::post_increment(", self.namespace)
    }

    pub fn assume_callee(&self) -> String {
        format!("{}.add_assumption", self.strategy_expr)
    }

    pub fn assert_callee(&self) -> String {
        format!("{}.add_assertion", self.strategy_expr)
    }

    /// `crv::any<int>`
    pub fn nondet_callee(&self, return_type: &str) -> String {
        format!("{}::any<{}>", self.namespace, return_type.trim())
    }

    pub fn runtime_include(&self, header: &str) -> String {
        format!("#include <{}>\n", header)
    }

    /// Statements inserted right after the entry point's opening brace.
    /// Always starts with a newline so an empty ledger yields `"\n"`.
    pub fn registrations<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> String {
        let mut block = String::from("\n");
        for name in names {
            block.push_str(&format!("  {}::make_any({});\n", self.namespace, name));
        }
        block
    }

    /// The driver appended after the renamed entry point.
    pub fn driver(&self) -> String {
        let s = &self.strategy_expr;
        let mut out = String::new();
        out.push_str("\n\n");
        out.push_str("int main() {\n");
        out.push_str("  bool error = false;\n");
        out.push_str("  std::chrono::seconds seconds(std::chrono::seconds::zero());\n");
        out.push_str("  {\n");
        out.push_str("    smt::NonReentrantTimer<std::chrono::seconds> timer(seconds);\n");
        out.push('\n');
        out.push_str("    do {\n");
        out.push_str(&format!("      {}();\n", RENAMED_ENTRY_POINT));
        out.push_str(&format!("      error |= smt::sat == {}.check();\n", s));
        out.push_str(&format!("    }} while ({}.find_next_path() && !error);\n", s));
        out.push_str("  }\n");
        out.push('\n');
        out.push_str("  if (error)\n");
        out.push_str("    std::cout << \"Found bug!\" << std::endl;\n");
        out.push_str("  else\n");
        out.push_str("    std::cout << \"Could not find any bugs.\" << std::endl;\n");
        out.push('\n');
        out.push_str(&format!(
            "  report_statistics({}.solver().stats(), {}.stats(), seconds);\n",
            s, s
        ));
        out.push('\n');
        out.push_str("  return error;\n");
        out.push('}');
        out
    }
}
