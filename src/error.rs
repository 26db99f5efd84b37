//! Error types for the banking assistant

use thiserror::Error;

/// Result type alias for banking operations
pub type Result<T> = std::result::Result<T, BankError>;

#[derive(Error, Debug)]
pub enum BankError {

    // =============================
    // Domain Errors
    // =============================

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Assistant error: {0}")]
    AssistantError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
