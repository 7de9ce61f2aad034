use axum::body::Body;
use axum::middleware::Next;
use axum::{extract::Request, response::Response};

use crate::response::AppError;
use crate::utils::extract_bearer_token;

/// Identity gate. The upstream authenticator has already vetted the caller
/// and put an opaque user id in the bearer token; requests without one are
/// turned away before any handler runs.
pub async fn authenticate(mut req: Request, next: Next) -> Result<Response<Body>, AppError> {
    let user_id = extract_bearer_token(&req)?;

    req.extensions_mut().insert(user_id);
    Ok(next.run(req).await)
}
