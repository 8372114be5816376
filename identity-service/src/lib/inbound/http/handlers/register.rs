use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::ProfileResponseData;
use crate::domain::authentication::models::RegisterCommand;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn register<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    JsonBody(body): JsonBody<RegisterRequestBody>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

/// Missing fields deserialize as empty strings and fail validation.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequestBody {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    confirm_password: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        RegisterCommand::new(
            self.first_name,
            self.last_name,
            self.email,
            self.password,
            &self.confirm_password,
        )
        .map_err(ApiError::from)
    }
}
