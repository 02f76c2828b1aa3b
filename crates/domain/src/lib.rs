//! `lossdesk-domain` — entity types and validation rules for loss-of-production
//! tracking.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod error;
pub mod lookup;
pub mod loss;

pub use error::{DomainError, DomainResult};
pub use lookup::{LookupKind, LookupRow, ReportingLimitArea, normalize_name};
pub use loss::{EventType, LossDraft, LossPatch, LossRecord, LossStatus};
