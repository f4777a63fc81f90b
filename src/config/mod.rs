pub mod resolve;
pub mod settings;

pub use settings::{ColumnsConfig, DisplayConfig, LayoutConfig, Settings, TableConfig};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("no course table configured (use --table, CURRICULUM_MAP_TABLE or [table] path)")]
    TableNotConfigured,
    #[error("unknown edge policy '{0}'")]
    UnknownPolicy(String),
    #[error("unknown trace scope '{0}'")]
    UnknownScope(String),
    #[error("invalid table delimiter '{0}': expected a single ASCII character")]
    InvalidDelimiter(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
