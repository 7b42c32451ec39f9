//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI arguments → environment variables → XDG paths → defaults.

use crate::settings::SimulationSettings;
use crate::validate::{validate_settings, ValidationResult};
use std::path::{Path, PathBuf};

/// Discovered settings file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to the settings file (or None if not found).
    pub settings: Option<PathBuf>,

    /// Source of the settings file (for diagnostics).
    pub settings_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "AB_CONFIG";
pub const ENV_CONFIG_DIR: &str = "AB_CONFIG_DIR";

/// Settings file names probed inside a config directory, in order.
const SETTINGS_FILENAMES: [&str; 2] = ["settings.toml", "settings.json"];

/// Application name for XDG directories.
const APP_NAME: &str = "abtest";

/// Resolve the settings file path.
///
/// Resolution order:
/// 1. Explicit CLI path (if it exists)
/// 2. `AB_CONFIG` environment variable
/// 3. `AB_CONFIG_DIR` environment variable + settings file name
/// 4. XDG config directory (~/.config/abtest/)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPaths {
    let mut paths = ConfigPaths::default();
    paths.settings = resolve_settings_path(cli_path, &mut paths.settings_source);
    paths
}

fn resolve_settings_path(cli_path: Option<&Path>, source: &mut ConfigSource) -> Option<PathBuf> {
    // 1. CLI argument
    if let Some(path) = cli_path {
        if path.exists() {
            *source = ConfigSource::CliArgument;
            return Some(path.to_path_buf());
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = find_settings_file(Path::new(&config_dir)) {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = find_settings_file(&dir) {
            *source = ConfigSource::XdgConfig;
            return Some(path);
        }
    }

    *source = ConfigSource::BuiltinDefault;
    None
}

fn find_settings_file(dir: &Path) -> Option<PathBuf> {
    SETTINGS_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Get the XDG config directory for abtest.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Load settings from the resolved path (or defaults), apply environment
/// overrides, and validate the result.
pub fn load_settings(paths: &ConfigPaths) -> ValidationResult<SimulationSettings> {
    let mut settings = match &paths.settings {
        Some(path) => SimulationSettings::from_file(path)?,
        None => SimulationSettings::default(),
    };
    settings.apply_env_overrides()?;
    validate_settings(&settings)?;
    Ok(settings)
}
