//! Core use-case services.
//!
//! # Responsibility
//! - Run each create/update/delete as one atomic admission.
//! - Keep transport layers decoupled from storage and validation details.
//!
//! # Invariants
//! - Every write goes through `admission::run_atomic`.
//! - Reads use the plain connection and are not serialized.

pub mod admission;
pub mod attendee_service;
pub mod event_service;
pub mod schedule_service;
pub mod session_service;
pub mod track_service;
