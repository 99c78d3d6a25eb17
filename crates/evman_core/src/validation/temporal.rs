//! Temporal conflict rules for events and sessions.
//!
//! # Responsibility
//! - Reject malformed intervals.
//! - Reject event overlap in the global scope and session overlap within a
//!   track.
//! - Enforce session containment inside its event, in time and by reference.
//!
//! # Invariants
//! - Checks run cheapest first: fields, interval, references, overlap scan.
//! - `exclude` removes the record being updated from its own overlap scope.

use super::shape::{check_event_fields, check_session_fields};
use super::{Rejection, RejectionKind, ScheduleLookup, ValidationResult};
use crate::model::event::{EventDraft, EventId};
use crate::model::interval::TimeWindow;
use crate::model::session::{SessionDraft, SessionId};

/// Validates a candidate event against the global event scope.
pub fn validate_event<L: ScheduleLookup>(
    draft: &EventDraft,
    exclude: Option<EventId>,
    lookup: &L,
) -> ValidationResult {
    check_event_fields(draft)?;
    let window = draft.window();
    require_well_formed(window)?;

    let conflicts = lookup.overlapping_events(window, exclude)?;
    if let Some(existing) = conflicts.first() {
        return Err(Rejection::new(
            RejectionKind::TemporalConflict,
            format!("event interval overlaps event {existing}"),
        )
        .into());
    }
    Ok(())
}

/// Validates the merged state of an event update.
///
/// On top of [`validate_event`], every stored session of the event must still
/// fit the new window and capacity must not drop below the attendee count.
pub fn validate_event_update<L: ScheduleLookup>(
    event_id: EventId,
    draft: &EventDraft,
    lookup: &L,
) -> ValidationResult {
    if lookup.event(event_id)?.is_none() {
        return Err(Rejection::not_found("event", event_id).into());
    }
    validate_event(draft, Some(event_id), lookup)?;

    let stranded = lookup.sessions_outside(event_id, draft.window())?;
    if !stranded.is_empty() {
        return Err(Rejection::new(
            RejectionKind::ContainmentViolation,
            format!(
                "{} session(s) would fall outside the event, first {}",
                stranded.len(),
                stranded[0]
            ),
        )
        .into());
    }

    let registered = lookup.attendee_count(event_id)?;
    if i64::try_from(registered).map_or(true, |count| count > draft.capacity) {
        return Err(Rejection::new(
            RejectionKind::CapacityExceeded,
            format!(
                "capacity {} is below {registered} registered attendees",
                draft.capacity
            ),
        )
        .into());
    }
    Ok(())
}

/// Validates a candidate session against its track, event and siblings.
pub fn validate_session<L: ScheduleLookup>(
    draft: &SessionDraft,
    exclude: Option<SessionId>,
    lookup: &L,
) -> ValidationResult {
    check_session_fields(draft)?;
    let window = draft.window();
    require_well_formed(window)?;

    let Some(track_id) = draft.track_uuid else {
        return Err(Rejection::invalid_input("track is required").into());
    };
    let Some(track) = lookup.track(track_id)? else {
        return Err(Rejection::not_found("track", track_id).into());
    };
    let Some(event) = lookup.event(draft.event_uuid)? else {
        return Err(Rejection::not_found("event", draft.event_uuid).into());
    };

    if track.event_uuid != event.uuid {
        return Err(Rejection::new(
            RejectionKind::ContainmentViolation,
            format!("track {} belongs to event {}", track.uuid, track.event_uuid),
        )
        .into());
    }
    if !event.window().contains(&window) {
        return Err(Rejection::new(
            RejectionKind::ContainmentViolation,
            format!("session interval is outside event {}", event.uuid),
        )
        .into());
    }

    let conflicts = lookup.overlapping_sessions(track.uuid, window, exclude)?;
    if let Some(existing) = conflicts.first() {
        return Err(Rejection::new(
            RejectionKind::TemporalConflict,
            format!("session interval overlaps session {existing}"),
        )
        .into());
    }
    Ok(())
}

fn require_well_formed(window: TimeWindow) -> ValidationResult {
    if !window.is_well_formed() {
        return Err(Rejection::new(
            RejectionKind::InvalidInterval,
            format!("end_at {} must be after start_at {}", window.end, window.start),
        )
        .into());
    }
    Ok(())
}
