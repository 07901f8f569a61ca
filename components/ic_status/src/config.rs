//! Configuration for status computation
//!
//! Options are read once when the [`crate::VM`] is created, from JSON or
//! from `IC_STATUS_<OPTION>` environment variables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted prototype walk bound
pub const MIN_PROTOTYPE_WALK_DEPTH: usize = 1;
/// Largest accepted prototype walk bound
pub const MAX_PROTOTYPE_WALK_DEPTH: usize = 64;

/// Errors raised while loading [`StatusOptions`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An option could not be parsed
    #[error("invalid value {value:?} for option {option}")]
    InvalidValue {
        /// Option name
        option: &'static str,
        /// Raw value as given
        value: String,
    },
    /// An option parsed but is outside its accepted range
    #[error("option {option} = {value} is outside {min}..={max}")]
    OutOfRange {
        /// Option name
        option: &'static str,
        /// Parsed value
        value: u64,
        /// Smallest accepted value
        min: u64,
        /// Largest accepted value
        max: u64,
    },
    /// The JSON document was malformed
    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for status computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusOptions {
    /// Consult JIT stubs; when off only the interpreter profile is used
    pub use_stub_feedback: bool,
    /// Let frequent bad-cache exits force the slow version of a status
    pub use_exit_site_feedback: bool,
    /// Bound on the prototype walk when folding a proven shape set
    pub max_prototype_walk_depth: usize,
    /// Slow-path calls after which a call site could take the slow path
    pub could_take_slow_case_minimum_count: u32,
    /// Trace-log every status a builder returns
    pub dump_statuses: bool,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            use_stub_feedback: true,
            use_exit_site_feedback: true,
            max_prototype_walk_depth: 8,
            could_take_slow_case_minimum_count: 10,
            dump_statuses: false,
        }
    }
}

impl StatusOptions {
    /// Parse options from a JSON object; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: StatusOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from `IC_STATUS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through `lookup`, which maps a variable name such as
    /// `IC_STATUS_DUMP_STATUSES` to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(raw) = lookup("IC_STATUS_USE_STUB_FEEDBACK") {
            options.use_stub_feedback = parse_bool("use_stub_feedback", &raw)?;
        }
        if let Some(raw) = lookup("IC_STATUS_USE_EXIT_SITE_FEEDBACK") {
            options.use_exit_site_feedback = parse_bool("use_exit_site_feedback", &raw)?;
        }
        if let Some(raw) = lookup("IC_STATUS_MAX_PROTOTYPE_WALK_DEPTH") {
            options.max_prototype_walk_depth = parse_number("max_prototype_walk_depth", &raw)?;
        }
        if let Some(raw) = lookup("IC_STATUS_COULD_TAKE_SLOW_CASE_MINIMUM_COUNT") {
            options.could_take_slow_case_minimum_count =
                parse_number("could_take_slow_case_minimum_count", &raw)?;
        }
        if let Some(raw) = lookup("IC_STATUS_DUMP_STATUSES") {
            options.dump_statuses = parse_bool("dump_statuses", &raw)?;
        }
        options.validate()?;
        Ok(options)
    }

    /// Check range constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.max_prototype_walk_depth;
        if !(MIN_PROTOTYPE_WALK_DEPTH..=MAX_PROTOTYPE_WALK_DEPTH).contains(&depth) {
            return Err(ConfigError::OutOfRange {
                option: "max_prototype_walk_depth",
                value: depth as u64,
                min: MIN_PROTOTYPE_WALK_DEPTH as u64,
                max: MAX_PROTOTYPE_WALK_DEPTH as u64,
            });
        }
        Ok(())
    }
}

fn parse_bool(option: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            option,
            value: raw.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(option: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        option,
        value: raw.to_string(),
    })
}
