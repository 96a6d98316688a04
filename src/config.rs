use serde::{Deserialize, Serialize};

/// Failure policy for a chain.
///
/// Created once at chain construction and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use kusari::Configuration;
///
/// // Default: halt on the first failing link, no retries.
/// let config = Configuration::default();
/// assert!(config.stop_on_failure);
/// assert_eq!(config.repeat_times_on_failure, 0);
///
/// // Allow a failing link three attempts before the chain halts.
/// let config = Configuration::retry(3);
/// assert!(!config.stop_on_failure);
/// assert_eq!(config.repeat_times_on_failure, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// If true, any link failure immediately halts the chain. Default: true.
    pub stop_on_failure: bool,
    /// Total attempts allowed for a failing link when `stop_on_failure` is
    /// false. 0 means a failing link halts the chain regardless of
    /// `stop_on_failure`. Default: 0.
    pub repeat_times_on_failure: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            stop_on_failure: true,
            repeat_times_on_failure: 0,
        }
    }
}

impl Configuration {
    /// Creates a configuration with explicit policy values.
    pub fn new(stop_on_failure: bool, repeat_times_on_failure: u32) -> Self {
        Self {
            stop_on_failure,
            repeat_times_on_failure,
        }
    }

    /// Creates a configuration that gives a failing link `times` attempts
    /// before the chain halts.
    ///
    /// Shorthand for `Configuration::new(false, times)`; retries only ever
    /// happen when `stop_on_failure` is false.
    pub fn retry(times: u32) -> Self {
        Self {
            stop_on_failure: false,
            repeat_times_on_failure: times,
        }
    }
}
