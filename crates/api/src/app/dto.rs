//! Request/response DTOs and JSON mapping helpers.
//!
//! Writes accept reference ids only. Reads replace reference ids with the
//! referenced row's display name and choice codes with their human label;
//! this enrichment never feeds back into write validation.

use serde::Deserialize;
use serde_json::json;

use lossdesk_domain::loss::LossRecord;
use lossdesk_domain::{LookupKind, LookupRow, ReportingLimitArea};
use lossdesk_store::Store;

/// Body for lookup create/update. `name` is optional so partial updates can
/// omit it; create paths reject its absence with a field-scoped error.
#[derive(Debug, Deserialize)]
pub struct LookupWrite {
    pub name: Option<String>,
}

/// Body for reporting-limit-area create/update.
#[derive(Debug, Deserialize)]
pub struct LimitAreaWrite {
    pub name: Option<String>,
    pub department: Option<i64>,
}

pub fn lookup_to_json(row: &LookupRow) -> serde_json::Value {
    json!({ "id": row.id, "name": row.name })
}

pub fn limit_area_to_json(area: &ReportingLimitArea, department_name: &str) -> serde_json::Value {
    json!({
        "id": area.id,
        "name": area.name,
        "department": department_name,
    })
}

pub fn loss_to_json(record: &LossRecord, store: &Store) -> serde_json::Value {
    let department = store
        .lookup_get(LookupKind::Department, record.department)
        .map(|row| row.name)
        .unwrap_or_default();
    let affected_area = store
        .lookup_get(LookupKind::AffectedArea, record.affected_area)
        .map(|row| row.name)
        .unwrap_or_default();
    let cause = store
        .lookup_get(LookupKind::Cause, record.cause)
        .map(|row| row.name)
        .unwrap_or_default();
    let reporting_limit_area = store
        .limit_area_get(record.reporting_limit_area)
        .map(|(area, department_name)| area.display(&department_name))
        .unwrap_or_default();

    json!({
        "id": record.id,
        "issue_date": record.issue_date,
        "department": department,
        "affected_area": affected_area,
        "equipment_or_process_step": record.equipment_or_process_step,
        "description": record.description,
        "cause": cause,
        "event_type": record.event_type.label(),
        "status": record.status.label(),
        "date_solved": record.date_solved,
        "reporting_limit_area": reporting_limit_area,
        "reporting_limit": record.reporting_limit,
    })
}
