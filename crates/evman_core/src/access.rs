//! Route allow-list for anonymous callers.
//!
//! # Responsibility
//! - Decide whether a request may proceed without authentication.
//! - Keep the public-route list explicit configuration instead of ambient
//!   request state.
//!
//! # Invariants
//! - Authenticated callers are always allowed; authorization beyond that is
//!   the routing layer's concern.
//! - Anonymous callers pass only on an exact method match and a path match
//!   where `{id}` stands for exactly one non-empty segment.

use serde::{Deserialize, Serialize};

/// One publicly reachable route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRoute {
    /// Upper-case HTTP method, e.g. `GET`.
    pub method: String,
    /// Path pattern, e.g. `/api/events/{id}/details/`.
    pub path: String,
}

impl PublicRoute {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Returns whether this route matches the request line.
    pub fn matches(&self, method: &str, path: &str) -> bool {
        if !self.method.eq_ignore_ascii_case(method.trim()) {
            return false;
        }
        path_matches(&self.path, path)
    }
}

/// Allow-list policy handed to the request-handling layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub public_routes: Vec<PublicRoute>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            public_routes: vec![
                PublicRoute::new("GET", "/api/events/"),
                PublicRoute::new("GET", "/api/events/{id}/details/"),
                PublicRoute::new("GET", "/api/docs/"),
                PublicRoute::new("POST", "/api/attendees/"),
            ],
        }
    }
}

impl AccessPolicy {
    /// Creates a policy with no public routes.
    pub fn deny_anonymous() -> Self {
        Self {
            public_routes: Vec::new(),
        }
    }

    /// Decides whether the request may proceed.
    pub fn is_allowed(&self, method: &str, path: &str, authenticated: bool) -> bool {
        if authenticated {
            return true;
        }
        self.public_routes
            .iter()
            .any(|route| route.matches(method, path))
    }
}

fn path_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some("{id}"), Some(segment)) if !segment.is_empty() => {}
            (Some(expected), Some(actual)) if expected == actual => {}
            _ => return false,
        }
    }
}
