use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered user together with its audit trail. Rows are
/// soft-deleted, so `deleted_at` is `Some` only for users no longer visible
/// to lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl User {
    /// Build a freshly registered user.
    ///
    /// Assigns a new identifier and records the registering email as the
    /// creating and updating actor.
    ///
    /// # Arguments
    /// * `first_name` - Validated first name
    /// * `last_name` - Validated last name
    /// * `email` - Validated email address
    /// * `password_hash` - Digest produced by the credential hasher
    /// * `now` - Registration timestamp
    pub fn register(
        first_name: PersonName,
        last_name: PersonName,
        email: EmailAddress,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        let actor = email.as_str().to_string();

        Self {
            id: UserId::new(),
            first_name,
            last_name,
            email,
            password_hash,
            created_at: now,
            created_by: actor.clone(),
            updated_at: now,
            updated_by: actor,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Kept exactly as submitted: no trimming or case folding, so lookups and the
/// uniqueness check are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 50;

    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `Empty` - Email is empty
    /// * `TooLong` - Email longer than 50 characters
    /// * `InvalidFormat` - Not exactly one `@` with non-empty parts on both sides
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.is_empty() {
            return Err(EmailError::Empty);
        }

        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        let mut parts = email.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(email))
            }
            _ => Err(EmailError::InvalidFormat),
        }
    }

    /// Get email as string slice.
    ///
    /// # Returns
    /// Email string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name of a person, 1 to 50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MAX_LENGTH: usize = 50;

    /// Create a new validated name.
    ///
    /// # Arguments
    /// * `field` - Field label used in error messages (`first_name`, `last_name`)
    /// * `name` - Raw name string
    ///
    /// # Errors
    /// * `Empty` - Name is empty
    /// * `TooLong` - Name longer than 50 characters
    pub fn new(field: &'static str, name: String) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty { field });
        }

        let length = name.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                field,
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password held only for the duration of a request.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 150;

    /// Validate a password chosen at registration.
    ///
    /// # Arguments
    /// * `password` - Chosen password
    /// * `confirmation` - Repeated password, must match exactly
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    /// * `TooShort` - Password shorter than 8 characters
    /// * `TooLong` - Password longer than 150 characters
    /// * `ConfirmationMismatch` - Confirmation differs from the password
    pub fn for_registration(password: String, confirmation: &str) -> Result<Self, PasswordError> {
        let password = Self::within_max_length(password)?;

        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        if password != confirmation {
            return Err(PasswordError::ConfirmationMismatch);
        }

        Ok(Self(password))
    }

    /// Validate a password presented at login.
    ///
    /// Only bounds are checked; strength is a registration concern and a
    /// short wrong password must fail as bad credentials.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    /// * `TooLong` - Password longer than 150 characters
    pub fn for_login(password: String) -> Result<Self, PasswordError> {
        Self::within_max_length(password).map(Self)
    }

    fn within_max_length(password: String) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        let length = password.chars().count();
        if length > Self::MAX_LENGTH {
            Err(PasswordError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(password)
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Public view of a user, never carrying credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub full_name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            full_name: user.full_name(),
        }
    }
}

/// Identity established from a validated access token, scoped to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> PersonName {
        PersonName::new("first_name", value.to_string()).unwrap()
    }

    #[test]
    fn test_email_accepts_simple_address() {
        let email = EmailAddress::new("a@b.com".to_string()).unwrap();
        assert_eq!(email.as_str(), "a@b.com");
    }

    #[test]
    fn test_email_is_kept_verbatim() {
        let email = EmailAddress::new("John.Doe@Example.COM".to_string()).unwrap();
        assert_eq!(email.as_str(), "John.Doe@Example.COM");
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert_eq!(EmailAddress::new(String::new()), Err(EmailError::Empty));
        for raw in ["plainaddress", "@b.com", "a@", "a@b@c.com", "@"] {
            assert_eq!(
                EmailAddress::new(raw.to_string()),
                Err(EmailError::InvalidFormat),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_email_rejects_too_long() {
        let raw = format!("{}@b.com", "a".repeat(45));
        assert_eq!(
            EmailAddress::new(raw),
            Err(EmailError::TooLong { max: 50, actual: 51 })
        );
    }

    #[test]
    fn test_name_bounds() {
        assert_eq!(
            PersonName::new("last_name", String::new()),
            Err(NameError::Empty { field: "last_name" })
        );
        assert!(PersonName::new("last_name", "x".repeat(50)).is_ok());
        assert!(matches!(
            PersonName::new("last_name", "x".repeat(51)),
            Err(NameError::TooLong { actual: 51, .. })
        ));
    }

    #[test]
    fn test_registration_password_policy() {
        assert!(Password::for_registration("password123".to_string(), "password123").is_ok());
        assert_eq!(
            Password::for_registration("short".to_string(), "short"),
            Err(PasswordError::TooShort { min: 8, actual: 5 })
        );
        assert_eq!(
            Password::for_registration("password123".to_string(), "password124"),
            Err(PasswordError::ConfirmationMismatch)
        );
        assert!(matches!(
            Password::for_registration("p".repeat(151), &"p".repeat(151)),
            Err(PasswordError::TooLong { .. })
        ));
    }

    #[test]
    fn test_login_password_only_checks_bounds() {
        assert!(Password::for_login("wrong".to_string()).is_ok());
        assert_eq!(
            Password::for_login(String::new()),
            Err(PasswordError::Empty)
        );
        assert!(Password::for_login("p".repeat(151)).is_err());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::for_login("hunter22".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));
    }

    #[test]
    fn test_register_sets_audit_fields() {
        let now = Utc::now();
        let user = User::register(
            name("John"),
            name("Doe"),
            EmailAddress::new("a@b.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            now,
        );

        assert_eq!(user.created_at, now);
        assert_eq!(user.updated_at, now);
        assert_eq!(user.created_by, "a@b.com");
        assert_eq!(user.updated_by, "a@b.com");
        assert!(user.deleted_at.is_none());
        assert_eq!(user.full_name(), "John Doe");
    }

    #[test]
    fn test_profile_from_user() {
        let user = User::register(
            name("John"),
            name("Doe"),
            EmailAddress::new("a@b.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            Utc::now(),
        );

        let profile = UserProfile::from(&user);
        assert_eq!(profile.user_id, user.id);
        assert_eq!(profile.email.as_str(), "a@b.com");
        assert_eq!(profile.full_name, "John Doe");
    }
}
