//! CRUD routes shared by the name-only lookup tables.
//!
//! One router per table, all built from the same handlers; the table is
//! carried as router state. Reads are open to every role, writes are
//! admin-gated by the decision table.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use lossdesk_auth::{Action, Target};
use lossdesk_domain::LookupKind;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router(kind: LookupKind) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
        .with_state(kind)
}

async fn list(
    State(kind): State<LookupKind>,
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::List, Target::Lookup) {
        return denied;
    }
    match services.store.lookup_list(kind) {
        Ok(rows) => {
            let items: Vec<_> = rows.iter().map(dto::lookup_to_json).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn retrieve(
    State(kind): State<LookupKind>,
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Retrieve, Target::Lookup) {
        return denied;
    }
    match services.store.lookup_get(kind, id) {
        Ok(row) => (StatusCode::OK, Json(dto::lookup_to_json(&row))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn create(
    State(kind): State<LookupKind>,
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::LookupWrite>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Create, Target::Lookup) {
        return denied;
    }
    let Some(name) = body.name else {
        return errors::missing_field("name");
    };
    match services.store.lookup_create(kind, &name) {
        Ok(row) => (StatusCode::CREATED, Json(dto::lookup_to_json(&row))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update(
    State(kind): State<LookupKind>,
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
    Json(body): Json<dto::LookupWrite>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Update, Target::Lookup) {
        return denied;
    }
    let result = match body.name {
        Some(name) => services.store.lookup_update(kind, id, &name),
        // A partial update without fields changes nothing.
        None => services.store.lookup_get(kind, id),
    };
    match result {
        Ok(row) => (StatusCode::OK, Json(dto::lookup_to_json(&row))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn destroy(
    State(kind): State<LookupKind>,
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Delete, Target::Lookup) {
        return denied;
    }
    match services.store.lookup_delete(kind, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
