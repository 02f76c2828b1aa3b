use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use lossdesk_auth::Hs256Tokens;

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<Hs256Tokens>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .tokens
        .verify_access(token)
        .map_err(|e| unauthenticated(e.to_string()))?;

    req.extensions_mut()
        .insert(PrincipalContext::new(claims.principal()));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| unauthenticated("authentication credentials were not provided"))?;

    let header = header
        .to_str()
        .map_err(|_| unauthenticated("invalid authorization header"))?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthenticated("invalid authorization header"))?;

    let token = header.trim();
    if token.is_empty() {
        return Err(unauthenticated("invalid authorization header"));
    }

    Ok(token)
}

fn unauthenticated(message: impl Into<String>) -> Response {
    errors::json_error(StatusCode::UNAUTHORIZED, "authentication_failed", message)
}
