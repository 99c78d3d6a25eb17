//! Scheduling domain model.
//!
//! # Responsibility
//! - Define the records persisted by the entity store.
//! - Define candidate drafts and patches consumed by the admission pipeline.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4.
//! - Instants are unix epoch milliseconds; intervals are half-open.
//! - `created_at`/`updated_at` are store-assigned and never taken from drafts.

pub mod attendee;
pub mod event;
pub mod interval;
pub mod schedule;
pub mod session;
pub mod track;

/// Unix epoch milliseconds.
pub type EpochMs = i64;
