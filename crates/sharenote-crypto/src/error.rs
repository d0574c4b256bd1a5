//! Error types for password hashing.

use thiserror::Error;

/// Password hashing errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Argon2 parameters were rejected.
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Stored hash is not a valid PHC string.
    #[error("Invalid password hash: {0}")]
    InvalidHash(String),

    /// Empty passwords are never hashed.
    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Result type for password hashing operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
