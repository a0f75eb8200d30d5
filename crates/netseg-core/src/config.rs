use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file to use when none is given.
pub const CONFIG_ENV: &str = "NETSEG_CONFIG";

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "netseg.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetsegConfig {
    #[serde(default)]
    pub mixing: MixingConfig,
    #[serde(default)]
    pub ssi: SsiConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixingConfig {
    /// Force a directed (`true`) or undirected (`false`) view.
    #[serde(default)]
    pub directed: Option<bool>,
    /// Whether self-ties count as possible dyads.
    #[serde(default)]
    pub loops: Option<bool>,
    #[serde(default)]
    pub full: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsiConfig {
    /// Convergence threshold for the symmetric eigen decomposition.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap for the eigen decomposition; `0` means unbounded.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
}

impl Default for SsiConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iter: default_max_iter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Skip groups without ties instead of failing (Gupta-Anderson-May Q).
    #[serde(default = "default_true")]
    pub drop_empty_groups: bool,
    /// Return the normalized `(r - 1) / (r + 1)` form of the SMI.
    #[serde(default = "default_true")]
    pub normalize_smi: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            drop_empty_groups: default_true(),
            normalize_smi: default_true(),
        }
    }
}

impl NetsegConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content).context("Failed to parse netseg config")
    }
}

/// Load a config file; a missing file yields defaults.
pub fn load_config(path: &Path) -> Result<NetsegConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(NetsegConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<NetsegConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve and load the effective config.
///
/// Precedence: `explicit` path, then `$NETSEG_CONFIG`, then `netseg.toml`
/// in `cwd`.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<NetsegConfig> {
    let path = resolve_path(explicit, env::var_os(CONFIG_ENV).map(PathBuf::from), cwd);
    load_config(&path)
}

fn resolve_path(explicit: Option<&Path>, env_path: Option<PathBuf>, cwd: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    if let Some(p) = env_path.filter(|p| !p.as_os_str().is_empty()) {
        return p;
    }
    cwd.join(CONFIG_FILE)
}

const fn default_true() -> bool {
    true
}

const fn default_tolerance() -> f64 {
    1e-12
}

const fn default_max_iter() -> usize {
    0
}
