use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::RegisterCommand;
use crate::domain::authentication::models::TokenPair;
use crate::domain::user::models::User;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Registration and login.
///
/// Argon2 work runs on the blocking pool so request workers stay responsive.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Credential hasher and token issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated registration command
    ///
    /// # Returns
    /// Profile of the created user
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Hashing` - Password could not be hashed
    /// * `ConstraintViolation` - Storage rejected the row
    /// * `DatabaseError` - Database operation failed
    pub async fn register(&self, command: RegisterCommand) -> Result<UserProfile, UserError> {
        if self.repository.exists_by_email(&command.email).await? {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
                .await?
                .map_err(|e| UserError::Hashing(e.to_string()))?;

        let user = User::register(
            command.first_name,
            command.last_name,
            command.email,
            password_hash,
            Utc::now(),
        );

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(UserProfile::from(&created_user))
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown email and wrong password produce the same error.
    ///
    /// # Arguments
    /// * `command` - Validated login command
    ///
    /// # Returns
    /// Access token and an empty refresh token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Hashing` - Stored hash unusable
    /// * `TokenSigning` - Token could not be signed
    /// * `DatabaseError` - Database operation failed
    pub async fn login(&self, command: LoginCommand) -> Result<TokenPair, UserError> {
        let user = match self.repository.find_by_email(&command.email).await? {
            Some(user) => user,
            None => {
                let authenticator = Arc::clone(&self.authenticator);
                let password = command.password;
                tokio::task::spawn_blocking(move || authenticator.verify_decoy(password.expose()))
                    .await?;

                tracing::warn!("Login rejected: unknown email");
                return Err(UserError::InvalidCredentials);
            }
        };

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let user_id = user.id.to_string();
        let email = user.email.as_str().to_string();
        let password_hash = user.password_hash;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &password_hash, &user_id, &email)
        })
        .await?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                UserError::InvalidCredentials
            }
            AuthenticationError::PasswordError(err) => UserError::Hashing(err.to_string()),
            AuthenticationError::JwtError(err) => UserError::TokenSigning(err.to_string()),
        })?;

        Ok(TokenPair {
            token: result.access_token,
            refresh_token: String::new(),
        })
    }
}
