//! CRUD routes for loss-of-production records.
//!
//! Reads are open to every role; writes require Admin or Editor. The store
//! re-runs reference checks and the department/reporting-limit-area rule on
//! every write path, including partial updates.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use lossdesk_auth::{Action, Target};
use lossdesk_domain::loss::{LossDraft, LossPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(replace).patch(patch).delete(destroy),
        )
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::List, Target::LossEvent) {
        return denied;
    }
    match services.store.loss_list() {
        Ok(records) => {
            let items: Vec<_> = records
                .iter()
                .map(|record| dto::loss_to_json(record, &services.store))
                .collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn retrieve(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Retrieve, Target::LossEvent) {
        return denied;
    }
    match services.store.loss_get(id) {
        Ok(record) => (
            StatusCode::OK,
            Json(dto::loss_to_json(&record, &services.store)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<LossDraft>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Create, Target::LossEvent) {
        return denied;
    }
    match services.store.loss_create(draft) {
        Ok(record) => (
            StatusCode::CREATED,
            Json(dto::loss_to_json(&record, &services.store)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn replace(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
    Json(draft): Json<LossDraft>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Update, Target::LossEvent) {
        return denied;
    }
    match services.store.loss_replace(id, draft) {
        Ok(record) => (
            StatusCode::OK,
            Json(dto::loss_to_json(&record, &services.store)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
    Json(patch): Json<LossPatch>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Update, Target::LossEvent) {
        return denied;
    }
    match services.store.loss_patch(id, &patch) {
        Ok(record) => (
            StatusCode::OK,
            Json(dto::loss_to_json(&record, &services.store)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Delete, Target::LossEvent) {
        return denied;
    }
    match services.store.loss_delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
