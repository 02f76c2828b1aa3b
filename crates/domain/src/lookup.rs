//! Classification tables used to categorize loss events.

use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult};

/// The four classification tables.
///
/// All of them sit behind the same permission category (admin-writable,
/// readable by every role), so most code treats them uniformly and only
/// branches where storage constraints differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Department,
    AffectedArea,
    Cause,
    ReportingLimitArea,
}

impl LookupKind {
    /// Lowercase model name, also used in permission codenames.
    pub fn model_name(&self) -> &'static str {
        match self {
            LookupKind::Department => "department",
            LookupKind::AffectedArea => "affectedarea",
            LookupKind::Cause => "cause",
            LookupKind::ReportingLimitArea => "reportinglimitarea",
        }
    }

    pub fn max_name_len(&self) -> usize {
        match self {
            LookupKind::Department | LookupKind::AffectedArea => 120,
            LookupKind::Cause | LookupKind::ReportingLimitArea => 160,
        }
    }
}

impl core::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.model_name())
    }
}

/// Row shape shared by the name-only lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRow {
    pub id: i64,
    pub name: String,
}

/// A reporting threshold region owned by one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingLimitArea {
    pub id: i64,
    pub name: String,
    pub department: i64,
}

impl ReportingLimitArea {
    /// Display form used on read paths: `"name (department name)"`.
    pub fn display(&self, department_name: &str) -> String {
        format!("{} ({})", self.name, department_name)
    }
}

/// Validate and normalize a lookup name: trimmed, non-empty, within the
/// table's length cap.
pub fn normalize_name(kind: LookupKind, raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "this field may not be blank"));
    }
    if name.chars().count() > kind.max_name_len() {
        return Err(DomainError::validation(
            "name",
            format!(
                "ensure this field has no more than {} characters",
                kind.max_name_len()
            ),
        ));
    }
    Ok(name.to_string())
}
