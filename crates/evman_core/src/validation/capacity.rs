//! Capacity and uniqueness rules for attendees and tracks.
//!
//! # Invariants
//! - A full event rejects with `CapacityExceeded` before the email is
//!   compared, so a full event never reports `DuplicateUnique`.
//! - Count and insert must share one transaction; the lookup passed in by the
//!   admission layer is bound to it.

use super::shape::{check_attendee_fields, check_track_name};
use super::{Rejection, RejectionKind, ScheduleLookup, ValidationResult};
use crate::model::attendee::{AttendeeDraft, AttendeeId};
use crate::model::track::TrackDraft;

/// Validates an attendee registration. `draft.name` must be sanitized.
pub fn validate_attendee<L: ScheduleLookup>(
    draft: &AttendeeDraft,
    exclude: Option<AttendeeId>,
    lookup: &L,
) -> ValidationResult {
    check_attendee_fields(draft)?;
    let Some(event_id) = draft.event_uuid else {
        return Err(Rejection::invalid_input("event is required").into());
    };
    let Some(event) = lookup.event(event_id)? else {
        return Err(Rejection::not_found("event", event_id).into());
    };

    let registered = lookup.attendee_count(event_id)?;
    if i64::try_from(registered).map_or(true, |count| count >= event.capacity) {
        return Err(Rejection::new(
            RejectionKind::CapacityExceeded,
            format!("event {event_id} is full ({registered}/{})", event.capacity),
        )
        .into());
    }

    if lookup.email_registered(event_id, &draft.email, exclude)? {
        return Err(Rejection::new(
            RejectionKind::DuplicateUnique,
            format!("email already registered for event {event_id}"),
        )
        .into());
    }
    Ok(())
}

/// Validates a track. Names are compared after trimming.
pub fn validate_track<L: ScheduleLookup>(draft: &TrackDraft, lookup: &L) -> ValidationResult {
    check_track_name(&draft.name)?;
    let Some(event_id) = draft.event_uuid else {
        return Err(Rejection::invalid_input("event is required").into());
    };
    if lookup.event(event_id)?.is_none() {
        return Err(Rejection::not_found("event", event_id).into());
    }
    if lookup.track_name_exists(event_id, draft.name.trim())? {
        return Err(Rejection::new(
            RejectionKind::DuplicateUnique,
            format!("track name already used in event {event_id}"),
        )
        .into());
    }
    Ok(())
}
