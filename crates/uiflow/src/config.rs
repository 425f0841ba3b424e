//! Configuration for uiflow.
//!
//! Loads config from:
//! 1. Global: ~/.config/uiflow/config.toml
//! 2. Per-project: .uiflow/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [workspace]
//! root = "/data/uiflow-workspace"
//!
//! [plan]
//! on_duplicate = "fail"
//!
//! [log]
//! level = "debug"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A config file that exists but cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid config {}: {source}", path.display())]
pub struct ConfigError {
    pub path: PathBuf,
    #[source]
    pub source: toml::de::Error,
}

/// What to do when two synthesized methods of one app share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The method read last replaces the earlier plan.
    #[default]
    Overwrite,
    /// Abort planning for the app.
    Fail,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory holding one subdirectory per app plus `actionplan/`.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PlanConfig {
    pub on_duplicate: Option<DuplicatePolicy>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct UiflowConfig {
    pub workspace: WorkspaceConfig,
    pub plan: PlanConfig,
    pub log: LogConfig,
}

impl UiflowConfig {
    /// Load configuration for a project directory.
    ///
    /// Loads global config from ~/.config/uiflow/config.toml,
    /// then merges with per-project config from .uiflow/config.toml.
    /// Files that fail to parse are skipped and returned alongside the
    /// config so the caller can report them once logging is up.
    pub fn load(project_dir: &Path) -> (Self, Vec<ConfigError>) {
        Self::load_with(Self::global_config_path().as_deref(), project_dir)
    }

    /// Like [`UiflowConfig::load`] with an explicit global config path.
    pub fn load_with(global_path: Option<&Path>, project_dir: &Path) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();

        let project_path = project_dir.join(".uiflow").join("config.toml");
        for path in global_path.into_iter().chain([project_path.as_path()]) {
            match Self::load_file(path) {
                Ok(Some(loaded)) => config = config.merge(loaded),
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }

        (config, errors)
    }

    /// Get the global config path.
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("uiflow").join("config.toml"))
    }

    /// Load config from a file path. A missing file yields `Ok(None)`.
    fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Ok(None);
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Merge another config into this one. Values set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            workspace: WorkspaceConfig {
                root: other.workspace.root.or(self.workspace.root),
            },
            plan: PlanConfig {
                on_duplicate: other.plan.on_duplicate.or(self.plan.on_duplicate),
            },
            log: LogConfig {
                level: other.log.level.or(self.log.level),
            },
        }
    }

    pub fn on_duplicate(&self) -> DuplicatePolicy {
        self.plan.on_duplicate.unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or("info")
    }
}
