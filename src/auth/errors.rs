//! # Auth Errors
//!
//! Error types for registration, login and session checks.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Request Errors
    // ==================
    /// Username or password missing from the request
    #[error("Username and password are required")]
    MissingCredentials,

    /// Username already registered
    #[error("Username already exists")]
    UsernameTaken,

    // ==================
    // Authentication Errors
    // ==================
    /// Unknown username or wrong password (generic on purpose)
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No token supplied for a protected operation
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Token unknown to the session registry, e.g. issued before a restart
    #[error("Invalid or expired token")]
    InvalidToken,

    // ==================
    // Internal Errors
    // ==================
    /// Session registry failure
    #[error("Session registry error: {0}")]
    Registry(String),

    /// User store failure
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingCredentials => 400,

            AuthError::InvalidCredentials => 401,
            AuthError::AuthenticationRequired => 401,
            AuthError::InvalidToken => 401,

            AuthError::UsernameTaken => 409,

            AuthError::Registry(_) => 500,
            AuthError::Storage(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::MissingCredentials.status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::InvalidToken.status_code(), 401);
        assert_eq!(AuthError::UsernameTaken.status_code(), 409);
        assert_eq!(AuthError::Registry("x".into()).status_code(), 500);
        assert!(!AuthError::Storage(StoreError::LockPoisoned).is_client_error());
    }

    #[test]
    fn test_credentials_error_does_not_leak_which_part_failed() {
        let msg = AuthError::InvalidCredentials.to_string();
        assert!(msg.contains("username or password"));
    }
}
