//! Markup stripping for free-text attendee input.
//!
//! # Invariants
//! - Percent-encoded and entity-encoded tags are decoded before stripping, so
//!   `%3Cscript%3E` and `&lt;script&gt;` are removed like `<script>`.
//! - A `<` that cannot start a tag (`<14`, `< 3`) and a bare `&` are kept.
//! - Output is trimmed.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

const MAX_DECODE_ROUNDS: usize = 4;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Za-z/!?][^>]*(?:>|$)").expect("valid tag regex"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(lt|gt|amp|quot|apos|#39|#x27|#60|#62);").expect("valid entity regex")
});

/// Returns `input` with markup removed and text content kept.
pub fn sanitize_markup(input: &str) -> String {
    let mut text = input.to_string();
    for _ in 0..MAX_DECODE_ROUNDS {
        let decoded = decode_entities(&percent_decode(&text)).into_owned();
        if decoded == text {
            break;
        }
        text = decoded;
    }

    loop {
        let stripped = TAG_RE.replace_all(&text, "");
        if stripped == text {
            break;
        }
        text = stripped.into_owned();
    }

    text.trim().to_string()
}

fn percent_decode(value: &str) -> Cow<'_, str> {
    if !value.contains('%') {
        return Cow::Borrowed(value);
    }
    urlencoding::decode(value).unwrap_or(Cow::Borrowed(value))
}

fn decode_entities(value: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(value, |caps: &Captures<'_>| match &caps[1] {
        "lt" | "#60" => "<",
        "gt" | "#62" => ">",
        "amp" => "&",
        "quot" => "\"",
        _ => "'",
    })
}
