// Run configuration for the rewrite engine.
// Built once per run and shared read-only by every translation unit.

use serde::{Deserialize, Serialize};

pub const DEFAULT_NAMESPACE: &str = "crv";
pub const DEFAULT_BRANCH: &str = "branch";
pub const DEFAULT_STRATEGY: &str = "sequential_dfs_checker";
pub const DEFAULT_ENTRY_POINT: &str = "main";

pub const ASSUME_FUNCTION: &str = "__VERIFIER_assume";
pub const ASSERT_FUNCTION: &str = "__VERIFIER_assert";
pub const NONDET_PATTERN: &str = "__VERIFIER_nondet_*";

/// Which family of rewrites to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Native symbolic execution: all rules plus driver synthesis.
    #[default]
    Nse,
    /// Concurrency tracing: branch flips and Internal/External state, no
    /// driver and no verifier intrinsics.
    Crv,
}

impl Profile {
    pub fn name(&self) -> &'static str {
        match self {
            Profile::Nse => "nse",
            Profile::Crv => "crv",
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nse" => Ok(Profile::Nse),
            "crv" => Ok(Profile::Crv),
            _ => Err(format!("unknown profile '{}' (expected nse or crv)", s)),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Function-name pattern. A single trailing `*` matches any suffix,
/// otherwise the name must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern(String);

impl NamePattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    pub fn matches(&self, name: &str) -> bool {
        match self.0.strip_suffix('*') {
            Some(prefix) => name.len() > prefix.len() && name.starts_with(prefix),
            None => name == self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentConfig {
    pub namespace: String,
    pub branch: String,
    pub strategy: String,
    pub entry_point: String,
    pub assume_function: String,
    pub assert_function: String,
    pub nondet_pattern: NamePattern,
    pub profile: Profile,
    /// Header to `#include` at the top of every instrumented file.
    pub runtime_header: Option<String>,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            strategy: DEFAULT_STRATEGY.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            assume_function: ASSUME_FUNCTION.to_string(),
            assert_function: ASSERT_FUNCTION.to_string(),
            nondet_pattern: NamePattern::new(NONDET_PATTERN),
            profile: Profile::Nse,
            runtime_header: None,
        }
    }
}

impl InstrumentConfig {
    pub fn is_entry_point(&self, name: &str) -> bool {
        self.entry_point == name
    }
}
