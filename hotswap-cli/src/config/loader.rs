use super::types::{
    ApplicationConfig, CONFIG_FILE_NAME, HotswapConfig, RawApplicationConfig, RawHotswapConfig,
};
use anyhow::{Context, Result};
use hotswap_paths::DEFAULT_APP_NAME;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    ///
    /// A default user config is written first if none exists, so there is
    /// always a file to edit. `user_path` replaces the default user config
    /// location when given.
    pub fn load(user_path: Option<&Path>) -> Result<HotswapConfig> {
        let user_path = Self::effective_user_path(user_path);
        Self::ensure_exists(&user_path)?;

        // Layer 1: User config
        let mut raw = Self::read_raw(&user_path)?;

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            let project_config = Self::read_raw(&project_path)?;
            raw = Self::merge_raw(raw, project_config);
        }

        // Convert to final config with defaults applied
        Ok(Self::finalize(raw))
    }

    /// Load a single config file, without layering
    pub fn load_from(path: &Path) -> Result<HotswapConfig> {
        Ok(Self::finalize(Self::read_raw(path)?))
    }

    /// Get user config path
    /// Can be overridden with HOTSWAP_CONFIG env var
    pub fn user_config_path() -> PathBuf {
        if let Ok(path) = std::env::var("HOTSWAP_CONFIG") {
            PathBuf::from(path)
        } else {
            hotswap_paths::app_dir(DEFAULT_APP_NAME).join(CONFIG_FILE_NAME)
        }
    }

    /// The user config file actually in use: `explicit` (from `--config`)
    /// if given, otherwise [`user_config_path`](Self::user_config_path)
    pub fn effective_user_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::user_config_path)
    }

    /// Get project config path
    /// Can be overridden with HOTSWAP_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("HOTSWAP_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join(CONFIG_FILE_NAME)
        } else {
            PathBuf::from(".hotswap").join(CONFIG_FILE_NAME)
        }
    }

    /// Write a default config at `path` if nothing is there yet.
    ///
    /// Returns true if a file was written.
    pub fn ensure_exists(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        tracing::info!(path = %path.display(), "Writing default configuration");
        Self::save_to_path(&HotswapConfig::default(), path)?;
        Ok(true)
    }

    /// Save config to a specific path
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to_path(config: &HotswapConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(config)?;
        std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;

        Ok(())
    }

    fn read_raw(path: &Path) -> Result<RawHotswapConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawHotswapConfig, overlay: RawHotswapConfig) -> RawHotswapConfig {
        RawHotswapConfig {
            application: RawApplicationConfig {
                name: overlay.application.name.or(base.application.name),
                match_policy: overlay
                    .application
                    .match_policy
                    .or(base.application.match_policy),
                module_dir: overlay.application.module_dir.or(base.application.module_dir),
                shadow_dir: overlay.application.shadow_dir.or(base.application.shadow_dir),
            },
            targets: if overlay.targets.is_empty() {
                base.targets
            } else {
                overlay.targets
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawHotswapConfig) -> HotswapConfig {
        let defaults = ApplicationConfig::default();
        HotswapConfig {
            application: ApplicationConfig {
                name: raw.application.name.unwrap_or(defaults.name),
                match_policy: raw.application.match_policy.unwrap_or(defaults.match_policy),
                module_dir: raw.application.module_dir,
                shadow_dir: raw.application.shadow_dir,
            },
            targets: raw.targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotswap_core::{MatchPolicy, ReloadTarget};
    use serial_test::serial;
    use tempfile::TempDir;

    fn target(type_name: &str) -> ReloadTarget {
        ReloadTarget::new("demo.so", "Demo.Views", type_name)
    }

    #[test]
    fn test_merge_overlay_wins_when_set() {
        let base = RawHotswapConfig {
            application: RawApplicationConfig {
                name: Some("base".to_string()),
                match_policy: Some(MatchPolicy::Suffix),
                module_dir: Some(PathBuf::from("/base")),
                shadow_dir: None,
            },
            targets: vec![target("BaseView")],
        };
        let overlay = RawHotswapConfig {
            application: RawApplicationConfig {
                name: Some("overlay".to_string()),
                ..Default::default()
            },
            targets: vec![],
        };

        let merged = ConfigLoader::merge_raw(base, overlay);

        assert_eq!(merged.application.name.as_deref(), Some("overlay"));
        assert_eq!(merged.application.match_policy, Some(MatchPolicy::Suffix));
        assert_eq!(merged.application.module_dir, Some(PathBuf::from("/base")));
        assert_eq!(merged.targets, vec![target("BaseView")]);
    }

    #[test]
    fn test_merge_overlay_targets_replace_base() {
        let base = RawHotswapConfig {
            targets: vec![target("BaseView")],
            ..Default::default()
        };
        let overlay = RawHotswapConfig {
            targets: vec![target("ProjectView")],
            ..Default::default()
        };

        let merged = ConfigLoader::merge_raw(base, overlay);
        assert_eq!(merged.targets, vec![target("ProjectView")]);
    }

    #[test]
    fn test_finalize_applies_defaults() {
        let config = ConfigLoader::finalize(RawHotswapConfig::default());
        assert_eq!(config.application.name, DEFAULT_APP_NAME);
        assert_eq!(config.application.match_policy, MatchPolicy::Exact);
    }

    #[test]
    fn test_ensure_exists_writes_default_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert!(ConfigLoader::ensure_exists(&path).unwrap());
        assert!(path.exists());
        assert!(!ConfigLoader::ensure_exists(&path).unwrap());

        let config = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(config.application.name, DEFAULT_APP_NAME);
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_load_from_reports_parse_errors_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[[targets]]\nmodule = 3\n").unwrap();

        let err = ConfigLoader::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains(CONFIG_FILE_NAME));
    }

    #[test]
    #[serial]
    fn test_load_layers_project_over_user() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        let user_path = user_dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(
            &user_path,
            r#"
[application]
name = "hotreloaddemo"

[[targets]]
module = "demo.so"
namespace = "Demo.Views"
type_name = "BaseView"
"#,
        )
        .unwrap();
        std::fs::write(
            project_dir.path().join(CONFIG_FILE_NAME),
            "[application]\nmatch_policy = \"suffix\"\n",
        )
        .unwrap();

        unsafe {
            std::env::set_var("HOTSWAP_CONFIG", &user_path);
            std::env::set_var("HOTSWAP_PROJECT_CONFIG_DIR", project_dir.path());
        }
        let config = ConfigLoader::load(None);
        unsafe {
            std::env::remove_var("HOTSWAP_CONFIG");
            std::env::remove_var("HOTSWAP_PROJECT_CONFIG_DIR");
        }
        let config = config.unwrap();

        assert_eq!(config.application.name, "hotreloaddemo");
        assert_eq!(config.application.match_policy, MatchPolicy::Suffix);
        assert_eq!(config.targets, vec![target("BaseView")]);
    }

    #[test]
    #[serial]
    fn test_load_creates_missing_user_config() {
        let dir = TempDir::new().unwrap();
        let user_path = dir.path().join("app").join(CONFIG_FILE_NAME);

        unsafe {
            std::env::set_var("HOTSWAP_CONFIG", &user_path);
            std::env::set_var("HOTSWAP_PROJECT_CONFIG_DIR", dir.path().join("no-project"));
        }
        let config = ConfigLoader::load(None);
        unsafe {
            std::env::remove_var("HOTSWAP_CONFIG");
            std::env::remove_var("HOTSWAP_PROJECT_CONFIG_DIR");
        }

        assert!(config.unwrap().targets.is_empty());
        assert!(user_path.exists());
    }

    #[test]
    #[serial]
    fn test_load_explicit_path_wins_over_env() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&explicit, "[application]\nname = \"explicit\"\n").unwrap();

        unsafe {
            std::env::set_var("HOTSWAP_CONFIG", dir.path().join("ignored.toml"));
            std::env::set_var("HOTSWAP_PROJECT_CONFIG_DIR", dir.path().join("no-project"));
        }
        let config = ConfigLoader::load(Some(&explicit));
        unsafe {
            std::env::remove_var("HOTSWAP_CONFIG");
            std::env::remove_var("HOTSWAP_PROJECT_CONFIG_DIR");
        }

        assert_eq!(config.unwrap().application.name, "explicit");
        assert!(!dir.path().join("ignored.toml").exists());
    }

    #[test]
    #[serial]
    fn test_effective_user_path_prefers_explicit() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let from_env = dir.path().join("env.toml");

        unsafe {
            std::env::set_var("HOTSWAP_CONFIG", &from_env);
        }
        let with_explicit = ConfigLoader::effective_user_path(Some(&explicit));
        let without = ConfigLoader::effective_user_path(None);
        unsafe {
            std::env::remove_var("HOTSWAP_CONFIG");
        }

        assert_eq!(with_explicit, explicit);
        assert_eq!(without, from_env);
    }
}
