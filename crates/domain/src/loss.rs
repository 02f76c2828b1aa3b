//! The loss-of-production record and its write-time rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lookup::ReportingLimitArea;
use crate::{DomainError, DomainResult};

pub const EQUIPMENT_MAX_LEN: usize = 200;
pub const REPORTING_LIMIT_MAX_LEN: usize = 200;

/// Whether the production stop was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "PLANNED")]
    Planned,
    #[serde(rename = "UNPLANNED")]
    Unplanned,
}

impl EventType {
    /// Human label used on read representations.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Planned => "Planned",
            EventType::Unplanned => "Unplanned",
        }
    }
}

/// Resolution state of a loss event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossStatus {
    #[serde(rename = "FINISHED")]
    Finished,
    #[serde(rename = "ONGOING")]
    Ongoing,
    #[serde(rename = "NO_SELECTION")]
    NoSelection,
}

impl LossStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LossStatus::Finished => "Finished",
            LossStatus::Ongoing => "Ongoing",
            LossStatus::NoSelection => "No-Selection",
        }
    }
}

/// A persisted loss-of-production event.
///
/// Scalar fields are owned by the record; `department`, `affected_area`,
/// `cause` and `reporting_limit_area` are non-owning references into the
/// lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossRecord {
    pub id: i64,
    pub issue_date: NaiveDate,
    pub department: i64,
    pub affected_area: i64,
    pub equipment_or_process_step: String,
    pub description: String,
    pub cause: i64,
    pub event_type: EventType,
    pub status: LossStatus,
    pub date_solved: Option<NaiveDate>,
    pub reporting_limit_area: i64,
    pub reporting_limit: String,
}

/// Incoming payload for create and full replace.
///
/// `issue_date` defaults to the current date when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct LossDraft {
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    pub department: i64,
    pub affected_area: i64,
    pub equipment_or_process_step: String,
    #[serde(default)]
    pub description: String,
    pub cause: i64,
    pub event_type: EventType,
    pub status: LossStatus,
    #[serde(default)]
    pub date_solved: Option<NaiveDate>,
    pub reporting_limit_area: i64,
    #[serde(default)]
    pub reporting_limit: String,
}

/// Field-by-field partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LossPatch {
    pub issue_date: Option<NaiveDate>,
    pub department: Option<i64>,
    pub affected_area: Option<i64>,
    pub equipment_or_process_step: Option<String>,
    pub description: Option<String>,
    pub cause: Option<i64>,
    pub event_type: Option<EventType>,
    pub status: Option<LossStatus>,
    pub date_solved: Option<NaiveDate>,
    pub reporting_limit_area: Option<i64>,
    pub reporting_limit: Option<String>,
}

impl LossRecord {
    /// Merge a partial update over the stored record into a draft, so the
    /// write path re-runs every rule regardless of which fields changed.
    pub fn patched(&self, patch: &LossPatch) -> LossDraft {
        LossDraft {
            issue_date: Some(patch.issue_date.unwrap_or(self.issue_date)),
            department: patch.department.unwrap_or(self.department),
            affected_area: patch.affected_area.unwrap_or(self.affected_area),
            equipment_or_process_step: patch
                .equipment_or_process_step
                .clone()
                .unwrap_or_else(|| self.equipment_or_process_step.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            cause: patch.cause.unwrap_or(self.cause),
            event_type: patch.event_type.unwrap_or(self.event_type),
            status: patch.status.unwrap_or(self.status),
            date_solved: patch.date_solved.or(self.date_solved),
            reporting_limit_area: patch.reporting_limit_area.unwrap_or(self.reporting_limit_area),
            reporting_limit: patch
                .reporting_limit
                .clone()
                .unwrap_or_else(|| self.reporting_limit.clone()),
        }
    }
}

/// The one cross-field rule: the chosen reporting limit area must be owned by
/// the chosen department.
pub fn limit_area_matches_department(area: &ReportingLimitArea, department: i64) -> bool {
    area.department == department
}

/// Field-scoped rejection for a mismatch, naming both sides.
pub fn limit_area_mismatch(area_display: &str, department_name: &str) -> DomainError {
    DomainError::validation(
        "reporting_limit_area",
        format!(
            "the selected reporting limit area ({area_display}) does not belong to the selected department ({department_name})"
        ),
    )
}

/// Scalar field rules shared by create and update.
pub fn validate_scalars(draft: &LossDraft) -> DomainResult<()> {
    if draft.equipment_or_process_step.trim().is_empty() {
        return Err(DomainError::validation(
            "equipment_or_process_step",
            "this field may not be blank",
        ));
    }
    if draft.equipment_or_process_step.chars().count() > EQUIPMENT_MAX_LEN {
        return Err(DomainError::validation(
            "equipment_or_process_step",
            format!("ensure this field has no more than {EQUIPMENT_MAX_LEN} characters"),
        ));
    }
    if draft.reporting_limit.chars().count() > REPORTING_LIMIT_MAX_LEN {
        return Err(DomainError::validation(
            "reporting_limit",
            format!("ensure this field has no more than {REPORTING_LIMIT_MAX_LEN} characters"),
        ));
    }
    Ok(())
}
