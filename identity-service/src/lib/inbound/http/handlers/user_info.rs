use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileResponseData;
use crate::domain::user::models::Identity;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn user_info<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    identity: Identity,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    state
        .profile_service
        .get_profile(&identity)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
