use axum::Router;

use lossdesk_domain::LookupKind;

pub mod auth;
pub mod limit_areas;
pub mod lookups;
pub mod loss;
pub mod system;

/// Routes reachable without a bearer token (credential/token exchange).
pub fn public_router() -> Router {
    auth::public_router()
}

/// Everything behind the bearer-auth middleware.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/departments", lookups::router(LookupKind::Department))
        .nest("/affected-areas", lookups::router(LookupKind::AffectedArea))
        .nest("/causes", lookups::router(LookupKind::Cause))
        .nest("/reporting-limit-areas", limit_areas::router())
        .nest("/lossofproduction", loss::router())
        .merge(auth::protected_router())
}
