use thiserror::Error;

use crate::registry::RegistryError;

/// Centralized error types for the application
///
/// Registry errors stay in their own enum so handlers can map them to
/// user-visible notices; everything else is wrapped here for consistent
/// propagation with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Folder registry errors (not found, collisions, validation, storage)
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
