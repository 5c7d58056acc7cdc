//! Event log configuration.
//!
//! Settings are fixed when the log is constructed. They can be built in code
//! or loaded from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Default capacity of the event log.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Environment variable holding the log capacity.
pub const MAX_ENTRIES_VAR: &str = "TALLY_MAX_ENTRIES";

/// Environment variable toggling the diagnostic mirror.
pub const MIRROR_DIAGNOSTICS_VAR: &str = "TALLY_MIRROR_DIAGNOSTICS";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Name of the variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Event log configuration.
///
/// Configuration values can be set via environment variables:
/// - `TALLY_MAX_ENTRIES`: Maximum number of retained entries (default: 100)
/// - `TALLY_MIRROR_DIAGNOSTICS`: Echo entries into `tracing` (default: true)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EventLogConfig {
    /// Maximum number of entries kept; older entries are evicted.
    #[validate(range(min = 1, max = 100_000, message = "max_entries must be between 1 and 100000"))]
    pub max_entries: usize,

    /// Whether each entry is mirrored to the diagnostic sink.
    pub mirror_to_diagnostics: bool,
}

impl EventLogConfig {
    /// Creates a configuration with the given capacity and the mirror enabled.
    ///
    /// # Example
    ///
    /// ```
    /// use eventlog::EventLogConfig;
    ///
    /// let config = EventLogConfig::new(25);
    /// assert_eq!(config.max_entries, 25);
    /// assert!(config.mirror_to_diagnostics);
    /// ```
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            mirror_to_diagnostics: true,
        }
    }

    /// Enables or disables the diagnostic mirror.
    #[must_use]
    pub fn with_mirror_to_diagnostics(mut self, enabled: bool) -> Self {
        self.mirror_to_diagnostics = enabled;
        self
    }

    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TALLY_MAX_ENTRIES` is set but is not a positive integer in range
    /// - `TALLY_MIRROR_DIAGNOSTICS` is set but is not a boolean
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EventLogConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(MAX_ENTRIES_VAR) {
            config.max_entries =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        var: MAX_ENTRIES_VAR,
                        value: value.clone(),
                    })?;
        }

        if let Some(value) = lookup(MIRROR_DIAGNOSTICS_VAR) {
            config.mirror_to_diagnostics =
                parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                    var: MIRROR_DIAGNOSTICS_VAR,
                    value: value.clone(),
                })?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
