//! Configuration for the todo demos.
//!
//! Both delays default to five seconds and can be overridden with
//! environment variables:
//!
//! - `TODO_FETCH_DELAY_MS`: latency of the simulated fetch
//! - `TODO_NOTIFICATION_TTL_MS`: how long a self-hiding notification stays
//!
//! # Example
//!
//! ```no_run
//! use todo::TodoConfig;
//!
//! let config = TodoConfig::from_env()?;
//! println!("fetch delay: {:?}", config.fetch_delay);
//! # Ok::<(), todo::ConfigError>(())
//! ```

use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`TodoConfig::fetch_delay`]
pub const FETCH_DELAY_ENV: &str = "TODO_FETCH_DELAY_MS";

/// Environment variable overriding [`TodoConfig::notification_ttl`]
pub const NOTIFICATION_TTL_ENV: &str = "TODO_NOTIFICATION_TTL_MS";

/// Default latency of the simulated fetch
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_secs(5);

/// Default lifetime of a self-hiding notification
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An override was not a whole number of milliseconds
    #[error("Invalid value for {var}: `{value}` is not a number of milliseconds")]
    InvalidMillis {
        /// The environment variable
        var: &'static str,
        /// The rejected value
        value: String,
    },
}

/// Delays used by the deferred action creators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoConfig {
    /// Time between `FETCH_TODOS_REQUEST` and the response
    pub fetch_delay: Duration,
    /// Time between `ADD_NOTIFICATION` and its `REMOVE_NOTIFICATION`
    pub notification_ttl: Duration,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            fetch_delay: DEFAULT_FETCH_DELAY,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

impl TodoConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMillis`] if a variable is set to
    /// something other than a non-negative integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through a variable lookup function
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMillis`] for unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(FETCH_DELAY_ENV) {
            config.fetch_delay = parse_millis(FETCH_DELAY_ENV, &value)?;
        }
        if let Some(value) = lookup(NOTIFICATION_TTL_ENV) {
            config.notification_ttl = parse_millis(NOTIFICATION_TTL_ENV, &value)?;
        }

        Ok(config)
    }

    /// Set the fetch delay
    #[must_use]
    pub const fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Set the notification lifetime
    #[must_use]
    pub const fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidMillis {
            var,
            value: value.to_string(),
        })
}
