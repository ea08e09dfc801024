use derive_more::From;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, From, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(ConfigError),

    #[error("Terminal I/O failed: {0}")]
    Io(std::io::Error),

    #[error("Failed to encode summary: {0}")]
    Json(serde_json::Error),

    #[error("Failed to encode settings: {0}")]
    Toml(toml::ser::Error),
}
