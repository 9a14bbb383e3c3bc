//! Bearer-token authentication for the admin routes.
//!
//! The injection endpoints share one pre-shared secret. A missing or
//! mismatched credential yields 401 with `WWW-Authenticate: Bearer` and
//! no side effect — nothing is broadcast on a failed attempt.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;

/// Validate the `Authorization: Bearer {token}` header.
///
/// `expected` holds the full `"Bearer <token>"` string so the check is a
/// direct comparison without per-request allocation.
pub async fn validate_bearer(
    expected: Arc<str>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth {
        Some(h) if h == expected.as_ref() => Ok(next.run(req).await),
        _ => {
            tracing::warn!(
                path = %req.uri().path(),
                "Unauthorized admin request - missing or invalid token"
            );
            let mut res = Response::new(axum::body::Body::empty());
            *res.status_mut() = StatusCode::UNAUTHORIZED;
            res.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
            Ok(res)
        }
    }
}
