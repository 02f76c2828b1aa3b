//! Token issuance, refresh and identity introspection.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use lossdesk_auth::effective_permissions;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Credential/token exchange, reachable without a bearer token.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/token", post(obtain_pair))
        .route("/auth/token/refresh", post(refresh))
}

/// Identity introspection, authenticated only (no role check).
pub fn protected_router() -> Router {
    Router::new().route("/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    username: String,
    password: String,
}

async fn obtain_pair(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<TokenRequest>,
) -> axum::response::Response {
    let Some(account) = services.directory.verify(&body.username, &body.password) else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "authentication_failed",
            "no active account found with the given credentials",
        );
    };

    match services.tokens.issue_pair(&account.principal()) {
        Ok(pair) => (
            StatusCode::OK,
            Json(json!({ "refresh": pair.refresh, "access": pair.access })),
        )
            .into_response(),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh: String,
}

async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RefreshRequest>,
) -> axum::response::Response {
    let claims = match services.tokens.verify_refresh(&body.refresh) {
        Ok(claims) => claims,
        Err(e) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "authentication_failed", e.to_string());
        }
    };

    match services.tokens.issue_access(&claims.principal()) {
        Ok(access) => (StatusCode::OK, Json(json!({ "access": access }))).into_response(),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", e.to_string()),
    }
}

async fn me(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    let principal = principal.principal();
    Json(json!({
        "username": principal.username,
        "groups": principal.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        "permissions": effective_permissions(principal),
    }))
}
