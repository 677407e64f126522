use auth::Claims;
use auth::JwtHandler;
use chrono::Duration;
use chrono::Utc;

use crate::domain::auth::errors::TokenError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::User;
use crate::domain::auth::ports::TokenIssuer;

/// Issues HS256 JWTs signed with the secret of the target application.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtTokenIssuer;

impl JwtTokenIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
        let handler = JwtHandler::new(app.secret.as_bytes())
            .map_err(|e| TokenError::SigningFailed(format!("app {}: {}", app.id, e)))?;

        let claims = Claims::issued_at(Utc::now(), user.id.0, user.email.as_str(), app.id.0, ttl)
            .map_err(|e| TokenError::SigningFailed(format!("ttl {}: {}", ttl, e)))?;

        handler
            .encode(&claims)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }
}
