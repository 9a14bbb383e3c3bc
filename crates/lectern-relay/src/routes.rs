//! Route definitions and router construction.
//!
//! The SSE stream is public (viewers are anonymous); the injection
//! endpoints sit behind the bearer middleware. `/health` bypasses both
//! auth and CORS.

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::auth::validate_bearer;
use crate::handlers;
use crate::state::AppState;

/// Build the relay router.
///
/// `admin_token` is the bare secret; the middleware holds the full
/// `Bearer <token>` rendering.
pub fn create_router(state: AppState, admin_token: &str) -> Router {
    let expected: Arc<str> = Arc::from(format!("Bearer {admin_token}"));
    let auth_layer = middleware::from_fn(move |req: Request, next: Next| {
        let expected = expected.clone();
        async move { validate_bearer(expected, req, next).await }
    });

    // Viewers connect from arbitrary origins (overlay pages, local files).
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/read", post(handlers::inject))
        .route("/bulk", post(handlers::bulk))
        .route("/clear", post(handlers::clear))
        .route_layer(auth_layer);

    let api = Router::new()
        .route("/events", get(handlers::events))
        .merge(admin);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api.layer(cors))
        .with_state(state)
}
