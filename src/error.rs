use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CurriculumError {
    #[error("row {row}: missing or invalid field '{field}': {detail}")]
    MissingField {
        row: usize,
        field: String,
        detail: String,
    },
    #[error("unknown course {0}")]
    UnknownNode(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read course table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CurriculumError>;
