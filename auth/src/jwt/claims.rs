use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Access token payload.
///
/// Asserts the identity of a user (`uid`, `email`) for one client
/// application (`app_id`) until `exp`. Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject user identifier
    pub uid: i64,

    /// Subject email
    pub email: String,

    /// Application the token is scoped to
    pub app_id: i32,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims issued now that expire after `ttl`.
    ///
    /// # Arguments
    /// * `uid` - User identifier
    /// * `email` - User email
    /// * `app_id` - Application identifier
    /// * `ttl` - Token lifetime
    ///
    /// # Errors
    /// * `ExpirationOutOfRange` - `ttl` pushes the expiration past the
    ///   representable date range
    pub fn for_user(
        uid: i64,
        email: impl Into<String>,
        app_id: i32,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        Self::issued_at(Utc::now(), uid, email, app_id, ttl)
    }

    /// Create claims issued at an explicit instant.
    pub fn issued_at(
        now: DateTime<Utc>,
        uid: i64,
        email: impl Into<String>,
        app_id: i32,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(JwtError::ExpirationOutOfRange)?;

        Ok(Self {
            uid,
            email: email.into(),
            app_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}
