use thiserror::Error;

/// Error type for JWT operations.
///
/// Validation failures collapse into `InvalidToken` so callers cannot tell a bad
/// signature from an expired token. `MissingClaim` only surfaces from
/// `Claims::ensure_identity`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}
