use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::profile::profile;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::CredentialStore;
use crate::account::service::AuthService;

pub struct AppState<CS: CredentialStore> {
    pub auth_service: Arc<AuthService<CS>>,
    pub token_service: Arc<TokenService>,
}

impl<CS: CredentialStore> Clone for AppState<CS> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            token_service: Arc::clone(&self.token_service),
        }
    }
}

pub fn create_router<CS: CredentialStore>(
    auth_service: Arc<AuthService<CS>>,
    token_service: Arc<TokenService>,
) -> Router {
    let state = AppState {
        auth_service,
        token_service,
    };

    let public_routes = Router::new()
        .route("/", get(welcome))
        .route("/auth/register", post(register::<CS>))
        .route("/auth/login", post(login::<CS>));

    let protected_routes = Router::new()
        .route("/auth/profile", get(profile::<CS>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<CS>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
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
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn welcome() -> &'static str {
    "Welcome to the campus platform"
}
