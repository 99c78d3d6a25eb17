//! Core runtime configuration.
//!
//! # Responsibility
//! - Hold store, pagination and access settings in one deserializable shape.
//! - Validate settings before any connection is opened.
//!
//! # Invariants
//! - Missing JSON fields fall back to defaults.
//! - `busy_timeout_ms` is bounded so admissions fail closed instead of hanging.

use crate::access::AccessPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_PAGE_LIMIT: u32 = 10;
const MAX_PAGE_LIMIT: u32 = 100;

/// SQLite connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound for waiting on the database write lock.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// List pagination bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl PaginationConfig {
    /// Resolves a caller-provided page size against configured bounds.
    ///
    /// `None` and `Some(0)` fall back to `default_limit`; larger values are
    /// capped at `max_limit`.
    pub fn normalize_limit(&self, limit: Option<u32>) -> u32 {
        match limit {
            Some(0) | None => self.default_limit,
            Some(value) if value > self.max_limit => self.max_limit,
            Some(value) => value,
        }
    }
}

/// Top-level configuration for embedding the core.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub store: StoreConfig,
    pub pagination: PaginationConfig,
    pub access: AccessPolicy,
}

/// Configuration parse/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid config value `{field}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl CoreConfig {
    /// Parses and validates configuration from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.busy_timeout_ms == 0 || self.store.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::InvalidValue {
                field: "store.busy_timeout_ms",
                message: format!("expected 1..={MAX_BUSY_TIMEOUT_MS}"),
            });
        }
        if self.pagination.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_limit",
                message: "must be positive".to_string(),
            });
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_limit",
                message: format!(
                    "{} exceeds max_limit {}",
                    self.pagination.default_limit, self.pagination.max_limit
                ),
            });
        }
        for route in &self.access.public_routes {
            if route.method.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "access.public_routes.method",
                    message: "must not be blank".to_string(),
                });
            }
            if !route.path.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: "access.public_routes.path",
                    message: format!("`{}` must start with `/`", route.path),
                });
            }
        }
        Ok(())
    }
}
