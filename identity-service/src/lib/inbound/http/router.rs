use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::fallback;
use super::handlers::handle_layer_error;
use super::handlers::handle_panic;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::user_info::user_info;
use super::middleware::authenticate as auth_middleware;
use crate::domain::authentication::service::AuthService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::ProfileService;

pub struct AppState<UR: UserRepository> {
    pub auth_service: Arc<AuthService<UR>>,
    pub profile_service: Arc<ProfileService<UR>>,
    pub authenticator: Arc<Authenticator>,
}

impl<UR: UserRepository> Clone for AppState<UR> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            profile_service: Arc::clone(&self.profile_service),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

pub fn create_router<UR: UserRepository>(
    auth_service: Arc<AuthService<UR>>,
    profile_service: Arc<ProfileService<UR>>,
    authenticator: Arc<Authenticator>,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        auth_service,
        profile_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register::<UR>))
        .route("/auth/login", post(login::<UR>));

    let protected_routes = Router::new()
        .route("/user/info", get(user_info::<UR>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<UR>,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
