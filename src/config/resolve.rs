use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Settings};

pub const CONFIG_FILE_NAME: &str = ".curriculum-map.toml";
pub const CONFIG_ENV: &str = "CURRICULUM_MAP_CONFIG";
pub const TABLE_ENV: &str = "CURRICULUM_MAP_TABLE";

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Config file the settings came from, if any was found.
    pub config_path: Option<PathBuf>,
    /// Directory relative table paths are resolved against.
    pub base_dir: PathBuf,
    pub settings: Settings,
}

impl ResolvedConfig {
    /// Course table location: explicit override, then `CURRICULUM_MAP_TABLE`,
    /// then `[table] path` relative to the config file.
    pub fn table_path(&self, table_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        let env_table = env::var(TABLE_ENV).ok().map(PathBuf::from);
        self.table_path_from(table_override.or(env_table))
    }

    fn table_path_from(&self, table_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = table_override {
            return Ok(path);
        }
        let configured = self
            .settings
            .table
            .path
            .as_ref()
            .ok_or(ConfigError::TableNotConfigured)?;
        let path = PathBuf::from(configured);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.base_dir.join(path))
        }
    }
}

pub fn resolve_config_with_override(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let env_config = env::var(CONFIG_ENV).ok().map(PathBuf::from);
    resolve_from(start.as_ref(), config_path.or(env_config))
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_from(start: &Path, config_path: Option<PathBuf>) -> Result<ResolvedConfig, ConfigError> {
    if let Some(config_path) = config_path {
        return resolve_with_config(config_path);
    }

    match find_config_from(start) {
        Some(config_path) => resolve_with_config(config_path),
        None => {
            tracing::debug!(start = %start.display(), "no config file found, using defaults");
            Ok(ResolvedConfig {
                config_path: None,
                base_dir: start.to_path_buf(),
                settings: Settings::default(),
            })
        }
    }
}

fn resolve_with_config(config_path: PathBuf) -> Result<ResolvedConfig, ConfigError> {
    let settings = load_settings(&config_path)?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    tracing::debug!(path = %config_path.display(), "loaded config");

    Ok(ResolvedConfig {
        config_path: Some(config_path),
        base_dir,
        settings,
    })
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
