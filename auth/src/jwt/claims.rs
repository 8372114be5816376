use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Identity claims carried by an access token.
///
/// Serialized as `{"user_id": ..., "email": ..., "exp": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject user identifier
    pub user_id: String,

    /// Email the subject authenticated with
    pub email: String,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Build claims for a user expiring `ttl` from now.
    ///
    /// The expiration is an absolute timestamp fixed at construction. A negative
    /// `ttl` yields claims that are already expired.
    pub fn for_user(user_id: impl ToString, email: impl ToString, ttl: Duration) -> Self {
        let expiration = Utc::now() + ttl;

        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            exp: expiration.timestamp(),
        }
    }

    /// Reject claims with empty identity fields.
    ///
    /// # Errors
    /// * `MissingClaim` - `user_id` or `email` is empty
    pub fn ensure_identity(&self) -> Result<(), JwtError> {
        if self.user_id.trim().is_empty() {
            return Err(JwtError::MissingClaim("user_id".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(JwtError::MissingClaim("email".to_string()));
        }
        Ok(())
    }
}
