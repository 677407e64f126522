use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthErrorKind;

pub mod is_admin;
pub mod login;
pub mod register;

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err.kind() {
            AuthErrorKind::InvalidCredentials => {
                Status::unauthenticated("invalid email or password")
            }
            AuthErrorKind::UserAlreadyExists => Status::already_exists("user already exists"),
            AuthErrorKind::UnknownApplication => Status::not_found("application not found"),
            AuthErrorKind::NotFound => Status::not_found("user not found"),
            AuthErrorKind::Internal => {
                tracing::debug!(error = %err, "internal error hidden from client");
                Status::internal("internal server error")
            }
        }
    }
}
