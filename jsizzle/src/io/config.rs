//! Tool configuration loaded from an optional TOML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::core::types::BusyPolicy;

/// Top-level configuration (TOML).
///
/// Missing fields default to values that work for interactive use.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub execution: ExecutionConfig,
    pub interface: InterfaceConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Wall-clock budget per run in milliseconds. `0` disables the bound.
    pub timeout_ms: u64,

    /// Heap limit for the script engine.
    pub memory_limit_bytes: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            memory_limit_bytes: 64 * 1024 * 1024,
        }
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InterfaceConfig {
    /// Run the interactive interface on the alternate screen.
    pub alt_screen: bool,

    /// Handling of a trigger that arrives while a script is running.
    pub busy_policy: BusyPolicy,

    /// Upper bound on the size of the edited source.
    pub max_source_bytes: usize,

    /// Where interactive-mode tracing goes. Nothing is logged when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            alt_screen: true,
            busy_policy: BusyPolicy::Drop,
            max_source_bytes: 1024 * 1024,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.execution.memory_limit_bytes == 0 {
            return Err(anyhow!("execution.memory_limit_bytes must be > 0"));
        }
        if self.interface.max_source_bytes == 0 {
            return Err(anyhow!("interface.max_source_bytes must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// A path that was asked for but does not exist is an error; callers without
/// a config file use `AppConfig::default()`.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        bail!("config file {} not found", path.display());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AppConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
