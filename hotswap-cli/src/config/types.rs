use hotswap_core::{MatchPolicy, ReloadTarget};
use hotswap_paths::DEFAULT_APP_NAME;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawHotswapConfig {
    #[serde(default)]
    pub application: RawApplicationConfig,

    #[serde(default)]
    pub targets: Vec<ReloadTarget>,
}

/// Application config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawApplicationConfig {
    /// Application name; names the documents subfolder holding the modules
    pub name: Option<String>,

    /// How target types are matched inside a module
    pub match_policy: Option<MatchPolicy>,

    /// Explicit module directory, overriding the documents subfolder
    pub module_dir: Option<PathBuf>,

    /// Where shadow copies of loaded modules are written
    pub shadow_dir: Option<PathBuf>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HotswapConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Views to reload, in order. The last one that loads stays on display.
    #[serde(default)]
    pub targets: Vec<ReloadTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub name: String,

    #[serde(default)]
    pub match_policy: MatchPolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_dir: Option<PathBuf>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            match_policy: MatchPolicy::default(),
            module_dir: None,
            shadow_dir: None,
        }
    }
}

impl HotswapConfig {
    /// Directory module file names are resolved against
    pub fn module_dir(&self) -> PathBuf {
        self.application
            .module_dir
            .clone()
            .unwrap_or_else(|| hotswap_paths::app_dir(&self.application.name))
    }

    /// Directory for shadow copies
    pub fn shadow_dir(&self) -> PathBuf {
        self.application
            .shadow_dir
            .clone()
            .unwrap_or_else(hotswap_paths::shadow_dir)
    }
}

/// Name of the configuration file inside the application directory
pub const CONFIG_FILE_NAME: &str = "hotswap.toml";
