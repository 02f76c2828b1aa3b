//! `lossdesk-store` — in-process entity store.
//!
//! Enforces what the relational layer is responsible for: name uniqueness on
//! the lookup tables, (name, department) uniqueness on reporting limit areas,
//! reference validity on loss records, and protected (never cascading)
//! deletes. Writes take the table lock, so conflicting concurrent writes have
//! exactly one winner.

pub mod memory;

pub use memory::Store;
