use std::fmt;

use thiserror::Error;

use crate::domain::auth::models::AppId;
use crate::domain::auth::models::UserId;

/// Boxed low-level cause attached to an `AuthError`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classified failure reason returned by the authentication service.
///
/// This set is closed: transports map each kind to exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// Unknown email or wrong password; the two are indistinguishable.
    InvalidCredentials,
    UserAlreadyExists,
    UnknownApplication,
    /// The referenced user does not exist.
    NotFound,
    /// Any unclassified infrastructure failure.
    Internal,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AuthErrorKind::InvalidCredentials => "invalid credentials",
            AuthErrorKind::UserAlreadyExists => "user already exists",
            AuthErrorKind::UnknownApplication => "unknown application",
            AuthErrorKind::NotFound => "not found",
            AuthErrorKind::Internal => "internal failure",
        };
        f.write_str(text)
    }
}

/// Error returned by the authentication service operations.
///
/// Carries the operation that failed, the classified kind, and the
/// collaborator error that caused it (if any).
#[derive(Debug, Error)]
#[error("{op}: {kind}")]
pub struct AuthError {
    op: &'static str,
    kind: AuthErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl AuthError {
    pub fn new(op: &'static str, kind: AuthErrorKind) -> Self {
        Self {
            op,
            kind,
            source: None,
        }
    }

    pub fn with_source(op: &'static str, kind: AuthErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            op,
            kind,
            source: Some(source.into()),
        }
    }

    pub fn internal(op: &'static str, source: impl Into<BoxError>) -> Self {
        Self::with_source(op, AuthErrorKind::Internal, source)
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn op(&self) -> &'static str {
        self.op
    }
}

/// Error for persistence operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("user already exists: {0}")]
    DuplicateEmail(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("app not found: {0}")]
    AppNotFound(AppId),

    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    pub fn user_not_found(id: UserId) -> Self {
        StorageError::UserNotFound(format!("id {}", id))
    }
}

/// Error for credential hashing operations
#[derive(Debug, Clone, Error)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("password verification failed: {0}")]
    VerificationFailed(String),
}

/// Error for token issuing operations
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    SigningFailed(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_display_includes_op_and_kind() {
        let err = AuthError::new("auth.login", AuthErrorKind::InvalidCredentials);
        assert_eq!(err.to_string(), "auth.login: invalid credentials");
    }

    #[test]
    fn test_source_is_preserved() {
        let err = AuthError::internal(
            "auth.register_new_user",
            StorageError::Database("disk I/O error".to_string()),
        );

        assert_eq!(err.kind(), AuthErrorKind::Internal);
        assert_eq!(err.op(), "auth.register_new_user");
        let source = err.source().expect("source should be attached");
        assert_eq!(source.to_string(), "database error: disk I/O error");
    }

    #[test]
    fn test_no_source_without_cause() {
        let err = AuthError::new("auth.is_admin", AuthErrorKind::NotFound);
        assert!(err.source().is_none());
    }
}
