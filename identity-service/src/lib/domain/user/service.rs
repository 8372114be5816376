use std::sync::Arc;

use crate::domain::user::models::Identity;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Profile lookups for authenticated callers.
pub struct ProfileService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> ProfileService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }

    /// Load the profile of the user behind a request identity.
    ///
    /// # Arguments
    /// * `identity` - Identity established by the authentication middleware
    ///
    /// # Returns
    /// Profile with id, email and full name
    ///
    /// # Errors
    /// * `NotFound` - User no longer exists (or was soft-deleted)
    /// * `DatabaseError` - Database operation failed
    pub async fn get_profile(&self, identity: &Identity) -> Result<UserProfile, UserError> {
        let user = self
            .repository
            .find_by_id(&identity.user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(identity.user_id.to_string()))?;

        Ok(UserProfile::from(&user))
    }
}
