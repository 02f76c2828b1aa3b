//! Route-side authorization guard.
//!
//! This enforces the decision table at the handler boundary, after
//! authentication and before any store call.

use axum::http::StatusCode;
use axum::response::Response;

use lossdesk_auth::{Action, Target, authorize};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Check the decision table for the current request context.
pub fn require(
    principal: &PrincipalContext,
    action: Action,
    target: Target,
) -> Result<(), Response> {
    authorize(principal.principal(), action, target)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "permission_denied", e.to_string()))
}
