use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::BoxError;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;

pub mod login;
pub mod register;
pub mod user_info;

/// Application-level result code carried next to the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i32")]
pub enum ResponseCode {
    Success = 1,
    BadRequest = -1,
    NotFound = -2,
    AuthFailed = -3,
    Internal = -4,
    Conflict = -13,
    Forbidden = -14,
}

impl From<ResponseCode> for i32 {
    fn from(code: ResponseCode) -> Self {
        code as i32
    }
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Boundary translator: every failure leaves the service through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    RequestTimeout(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ResponseCode::Internal,
                    "Internal Server Error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ResponseCode::BadRequest, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ResponseCode::NotFound, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ResponseCode::Conflict, msg),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ResponseCode::AuthFailed, msg)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ResponseCode::Forbidden, msg),
            ApiError::RequestTimeout(msg) => {
                tracing::warn!("Request exceeded its deadline");
                (StatusCode::REQUEST_TIMEOUT, ResponseCode::Internal, msg)
            }
        };

        (status, Json(ApiResponseBody::new_error(status, code, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidName(_)
            | UserError::InvalidPassword(_)
            | UserError::ConstraintViolation(_) => ApiError::BadRequest(err.to_string()),
            UserError::Hashing(_)
            | UserError::TokenSigning(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the response envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Convert a handler panic into the internal-error envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::InternalServerError(format!("handler panicked: {}", detail)).into_response()
}

/// Convert errors raised by service middleware (the request deadline) into the envelope.
pub async fn handle_layer_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::RequestTimeout("Request Timeout".to_string())
    } else {
        ApiError::InternalServerError(format!("unhandled middleware error: {}", err))
    }
}

pub async fn fallback() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    code: ResponseCode,
    data: Option<T>,
    message: String,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            code: ResponseCode::Success,
            data: Some(data),
            message: "Success".to_string(),
        }
    }
}

impl ApiResponseBody<()> {
    pub fn new_error(status_code: StatusCode, code: ResponseCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            code,
            data: None,
            message,
        }
    }
}

/// Profile as rendered by registration and `/user/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
}

impl From<&UserProfile> for ProfileResponseData {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            email: profile.email.as_str().to_string(),
            full_name: profile.full_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::json;
    use serde_json::Value;

    use super::*;
    use crate::user::errors::EmailError;
    use crate::user::errors::PasswordError;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = ApiSuccess::new(StatusCode::OK, json!({ "token": "abc" })).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "status_code": 200,
                "code": 1,
                "data": { "token": "abc" },
                "message": "Success"
            })
        );
    }

    #[tokio::test]
    async fn test_error_envelope_has_null_data() {
        let response = ApiError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "status_code": 401,
                "code": -3,
                "data": null,
                "message": "Unauthorized"
            })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            ApiError::from(UserError::DatabaseError("relation users does not exist".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], -4);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_status_and_code_per_kind() {
        let cases = [
            (ApiError::BadRequest("x".into()), 400, -1),
            (ApiError::Unauthorized("x".into()), 401, -3),
            (ApiError::Forbidden("x".into()), 403, -14),
            (ApiError::NotFound("x".into()), 404, -2),
            (ApiError::Conflict("x".into()), 409, -13),
            (ApiError::InternalServerError("x".into()), 500, -4),
            (ApiError::RequestTimeout("x".into()), 408, -4),
        ];

        for (error, status, code) in cases {
            let response = error.into_response();
            assert_eq!(response.status().as_u16(), status);
            assert_eq!(body_json(response).await["code"], code);
        }
    }

    #[test]
    fn test_user_error_mapping() {
        assert_eq!(
            ApiError::from(UserError::EmailAlreadyExists("a@b.com".into())),
            ApiError::Conflict("email already exists".into())
        );
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials),
            ApiError::Unauthorized("invalid email or password".into())
        );
        assert_eq!(
            ApiError::from(UserError::NotFound("id".into())),
            ApiError::NotFound("user not found".into())
        );
        assert!(matches!(
            ApiError::from(UserError::InvalidEmail(EmailError::InvalidFormat)),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::InvalidPassword(PasswordError::ConfirmationMismatch)),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::ConstraintViolation("users".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::TokenSigning("empty secret".into())),
            ApiError::InternalServerError(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_layer_error_is_internal() {
        let other = handle_layer_error("overloaded".into()).await;
        assert!(matches!(other, ApiError::InternalServerError(_)));
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "Internal Server Error");
    }
}
