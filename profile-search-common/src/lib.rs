pub mod config;
pub use config::{
    ColumnMap, Config, DatasetConfig, LogLevel, LoggingConfig, MatchMode, SearchConfig, ServerConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileSearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Dataset not loaded")]
    DatasetUnavailable,
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid value {value:?} in column '{column}'")]
    InvalidValue { column: String, value: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

impl ProfileSearchError {
    /// true for errors caused by the caller's input rather than server state
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, ProfileSearchError>;
