//! Error types for sharenote.

use thiserror::Error;

/// Result type alias using sharenote's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sharenote operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Caller supplied an identifier that is not well-formed
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Well-formed reference to a record that does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Username/password pair did not match a stored user
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing or hash parsing failed
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by the caller rather than by the server or store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidId(_)
                | Error::NotFound(_)
                | Error::Conflict(_)
                | Error::InvalidCredentials
                | Error::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_id() {
        let err = Error::InvalidId("Invalid note ID format".to_string());
        assert_eq!(err.to_string(), "Invalid id: Invalid note ID format");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("Note not found".to_string());
        assert_eq!(err.to_string(), "Not found: Note not found");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict("Username already exists".to_string());
        assert_eq!(err.to_string(), "Conflict: Username already exists");
    }

    #[test]
    fn test_error_display_invalid_credentials() {
        assert_eq!(
            Error::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_client_errors_are_classified() {
        assert!(Error::InvalidId("x".into()).is_client_error());
        assert!(Error::NotFound("x".into()).is_client_error());
        assert!(Error::Conflict("x".into()).is_client_error());
        assert!(Error::InvalidCredentials.is_client_error());
        assert!(!Error::Internal("x".into()).is_client_error());
        assert!(!Error::Database(sqlx::Error::PoolTimedOut).is_client_error());
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: Error = sqlx::Error::RowNotFound.into();
        match err {
            Error::Database(_) => {}
            _ => panic!("Expected Database error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
