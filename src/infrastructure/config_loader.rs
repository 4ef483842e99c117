//! TOML configuration file.
//!
//! ```toml
//! namespace = "crv"
//! branch = "branch"
//! strategy = "sequential_dfs_checker"
//! entry_point = "main"
//! profile = "nse"
//! runtime_header = "crv.h"
//! ```
//!
//! Every key is optional; missing keys keep the built-in default. The
//! recognition names for assume/assert/nondet calls are not configurable.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::config::{InstrumentConfig, Profile};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub namespace: Option<String>,
    pub branch: Option<String>,
    pub strategy: Option<String>,
    pub entry_point: Option<String>,
    pub profile: Option<Profile>,
    pub runtime_header: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay the keys present in the file onto `config`.
    pub fn apply_to(self, config: &mut InstrumentConfig) {
        if let Some(namespace) = self.namespace {
            config.namespace = namespace;
        }
        if let Some(branch) = self.branch {
            config.branch = branch;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(entry_point) = self.entry_point {
            config.entry_point = entry_point;
        }
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if self.runtime_header.is_some() {
            config.runtime_header = self.runtime_header;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = ConfigFile::parse("strategy = \"bfs_checker\"\n").unwrap();
        let mut config = InstrumentConfig::default();
        file.apply_to(&mut config);
        assert_eq!(config.strategy, "bfs_checker");
        assert_eq!(config.namespace, "crv");
        assert_eq!(config.profile, Profile::Nse);
    }

    #[test]
    fn test_full_file() {
        let content = r#"
namespace = "sym"
branch = "decide"
strategy = "bfs"
entry_point = "harness"
profile = "crv"
runtime_header = "sym.h"
"#;
        let mut config = InstrumentConfig::default();
        ConfigFile::parse(content).unwrap().apply_to(&mut config);
        assert_eq!(config.namespace, "sym");
        assert_eq!(config.branch, "decide");
        assert_eq!(config.entry_point, "harness");
        assert_eq!(config.profile, Profile::Crv);
        assert_eq!(config.runtime_header.as_deref(), Some("sym.h"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ConfigFile::parse("assume_function = \"my_assume\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = ConfigFile::load(&dir.path().join("nse.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
