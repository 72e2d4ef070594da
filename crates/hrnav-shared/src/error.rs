//! Application error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },
}
