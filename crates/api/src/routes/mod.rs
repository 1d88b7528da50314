//! API routes

pub mod auth;
pub mod health;
pub mod messages;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth::require_auth, state::AppState, websocket::ws_handler};

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness));

    // Public API routes (no auth required)
    let public_api_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    // Protected API routes (require bearer token)
    let protected_api_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/update-profile", put(auth::update_profile))
        .route("/auth/check", get(auth::check))
        .route("/messages/users", get(messages::users_for_sidebar))
        .route("/messages/send/:id", post(messages::send_message))
        .route("/messages/:id", get(messages::get_messages))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = public_api_routes.merge(protected_api_routes);

    Router::new()
        .merge(health_routes)
        .route("/ws", get(ws_handler))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.max_request_body_bytes))
        .layer(cors_layer(&state.config.client_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the browser client
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "Invalid CLIENT_ORIGIN, CORS disabled");
            layer
        }
    }
}
