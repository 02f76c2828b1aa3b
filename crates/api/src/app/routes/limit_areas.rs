//! CRUD routes for reporting limit areas.
//!
//! Same permission category as the other lookup tables, but the rows carry a
//! department reference, so the handlers resolve the owning department's name
//! on every read.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use lossdesk_auth::{Action, Target};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::List, Target::Lookup) {
        return denied;
    }
    match services.store.limit_area_list() {
        Ok(rows) => {
            let items: Vec<_> = rows
                .iter()
                .map(|(area, department_name)| dto::limit_area_to_json(area, department_name))
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
    if let Err(denied) = authz::require(&principal, Action::Retrieve, Target::Lookup) {
        return denied;
    }
    match services.store.limit_area_get(id) {
        Ok((area, department_name)) => (
            StatusCode::OK,
            Json(dto::limit_area_to_json(&area, &department_name)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::LimitAreaWrite>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Create, Target::Lookup) {
        return denied;
    }
    let Some(name) = body.name else {
        return errors::missing_field("name");
    };
    let Some(department) = body.department else {
        return errors::missing_field("department");
    };
    match services.store.limit_area_create(&name, department) {
        Ok((area, department_name)) => (
            StatusCode::CREATED,
            Json(dto::limit_area_to_json(&area, &department_name)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
    Json(body): Json<dto::LimitAreaWrite>,
) -> axum::response::Response {
    if let Err(denied) = authz::require(&principal, Action::Update, Target::Lookup) {
        return denied;
    }
    match services
        .store
        .limit_area_update(id, body.name.as_deref(), body.department)
    {
        Ok((area, department_name)) => (
            StatusCode::OK,
            Json(dto::limit_area_to_json(&area, &department_name)),
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
    if let Err(denied) = authz::require(&principal, Action::Delete, Target::Lookup) {
        return denied;
    }
    match services.store.limit_area_delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
