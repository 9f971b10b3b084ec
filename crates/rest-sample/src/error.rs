use rest_framework::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Startup and shutdown failures surfaced by `main`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to seed posts: {0}")]
    Seed(#[from] StoreError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
