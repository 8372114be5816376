use std::sync::OnceLock;

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Share it behind an `Arc`. The only state set after construction is the
/// decoy hash, written once.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    decoy_hash: OnceLock<Option<String>>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for HS256 signing
    /// * `token_ttl` - Lifetime of issued access tokens
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash; mismatch is `Ok(false)`.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed or the primitive failed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Spend one password verification on a login for an unknown account.
    ///
    /// Verifies against a fixed decoy hash, built on first use, so a lookup
    /// miss costs as much Argon2 work as a wrong password. The outcome is
    /// always a rejection.
    pub fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash(DECOY_PASSWORD).ok());

        let spent = match decoy {
            Some(hash) => self.password_hasher.verify(password, hash).map(|_| ()),
            None => self.password_hasher.hash(password).map(|_| ()),
        };

        if let Err(e) = spent {
            tracing::debug!(error = %e, "decoy verification failed");
        }
    }

    /// Verify credentials and issue an access token for the given identity.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: &str,
        email: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(user_id, email)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token for an identity without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, user_id: &str, email: &str) -> Result<String, JwtError> {
        let claims = Claims::for_user(user_id, email, self.token_ttl);
        self.jwt_handler.encode(&claims)
    }

    /// Validate a token and return its identity claims.
    ///
    /// Tokens with empty `user_id` or `email` are rejected like any other
    /// invalid token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, forged, expired or claims-empty
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        claims.ensure_identity().map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            JwtError::InvalidToken
        })?;

        Ok(claims)
    }
}
