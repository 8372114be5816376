use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::user::errors::UserError;

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    /// Validate raw registration input into a command.
    ///
    /// # Arguments
    /// * `first_name` - Raw first name
    /// * `last_name` - Raw last name
    /// * `email` - Raw email
    /// * `password` - Chosen password
    /// * `confirm_password` - Repeated password
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is empty, too long or malformed
    /// * `InvalidName` - A name is empty or too long
    /// * `InvalidPassword` - Password breaks the length policy or confirmation differs
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        confirm_password: &str,
    ) -> Result<Self, UserError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            first_name: PersonName::new("first_name", first_name)?,
            last_name: PersonName::new("last_name", last_name)?,
            password: Password::for_registration(password, confirm_password)?,
        })
    }
}

/// Command to log in with email and password
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl LoginCommand {
    /// # Errors
    /// * `InvalidEmail` - Email is empty, too long or malformed
    /// * `InvalidPassword` - Password is empty or too long
    pub fn new(email: String, password: String) -> Result<Self, UserError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password::for_login(password)?,
        })
    }
}

/// Tokens handed out on successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    /// Always empty; refresh tokens are not issued.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::PasswordError;

    #[test]
    fn test_register_command_valid() {
        let command = RegisterCommand::new(
            "John".to_string(),
            "Doe".to_string(),
            "a@b.com".to_string(),
            "password123".to_string(),
            "password123",
        )
        .unwrap();

        assert_eq!(command.email.as_str(), "a@b.com");
        assert_eq!(command.first_name.as_str(), "John");
        assert_eq!(command.last_name.as_str(), "Doe");
    }

    #[test]
    fn test_register_command_mismatch_fails_even_with_valid_fields() {
        let result = RegisterCommand::new(
            "John".to_string(),
            "Doe".to_string(),
            "a@b.com".to_string(),
            "password123".to_string(),
            "password321",
        );

        assert!(matches!(
            result,
            Err(UserError::InvalidPassword(PasswordError::ConfirmationMismatch))
        ));
    }

    #[test]
    fn test_register_command_rejects_missing_name() {
        let result = RegisterCommand::new(
            String::new(),
            "Doe".to_string(),
            "a@b.com".to_string(),
            "password123".to_string(),
            "password123",
        );

        assert!(matches!(result, Err(UserError::InvalidName(_))));
    }

    #[test]
    fn test_login_command_rejects_bad_email() {
        let result = LoginCommand::new("not-an-email".to_string(), "password123".to_string());
        assert!(matches!(result, Err(UserError::InvalidEmail(_))));
    }
}
