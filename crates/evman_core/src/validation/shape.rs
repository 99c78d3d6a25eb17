//! Structural field checks that need no store access.

use super::{Rejection, ValidationResult};
use crate::model::attendee::AttendeeDraft;
use crate::model::event::EventDraft;
use crate::model::session::SessionDraft;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub fn check_event_fields(draft: &EventDraft) -> ValidationResult {
    require_text("name", &draft.name)?;
    require_text("venue", &draft.venue)?;
    if draft.capacity < 0 {
        return Err(Rejection::invalid_input(format!(
            "capacity must be >= 0, got {}",
            draft.capacity
        ))
        .into());
    }
    Ok(())
}

pub fn check_track_name(name: &str) -> ValidationResult {
    require_text("name", name)
}

pub fn check_session_fields(draft: &SessionDraft) -> ValidationResult {
    require_text("title", &draft.title)?;
    require_text("speaker", &draft.speaker)
}

/// Expects `draft.name` to be sanitized already.
pub fn check_attendee_fields(draft: &AttendeeDraft) -> ValidationResult {
    require_text("name", &draft.name)?;
    if !is_email_shaped(&draft.email) {
        return Err(Rejection::invalid_input("email is not a valid address").into());
    }
    Ok(())
}

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn require_text(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(Rejection::invalid_input(format!("{field} must not be blank")).into());
    }
    Ok(())
}
