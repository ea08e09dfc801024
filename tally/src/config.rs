//! # Configuration Module - Runtime Behavior Settings
//!
//! This module provides configuration options for customizing the behavior of a
//! [`SessionController`](crate::session::SessionController). Configuration affects
//! the periodic clock cadence and how much detail the end-of-session report keeps.
//!
//! ## Usage
//!
//! ```rust
//! use tally::config::Configuration;
//! use tally::clock::Duration;
//!
//! // Use default configuration
//! let config = Configuration::default();
//! assert_eq!(config.tick_interval, Duration::from_millis(200));
//!
//! // Custom configuration
//! let config = Configuration {
//!     tick_interval: Duration::from_millis(500),
//!     ..Configuration::default()
//! };
//! ```

use crate::clock::Duration;

/// Runtime configuration for a typing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Cadence of the periodic clock tick while a session is running
    ///
    /// The tick only refreshes the elapsed-time display and the live WPM; it
    /// never touches character tallies.
    ///
    /// **Default**: 200 milliseconds
    pub tick_interval: Duration,

    /// Maximum number of entries in the error-prone letter list
    ///
    /// **Default**: 8
    pub letter_report_limit: usize,

    /// Maximum number of mismatched words listed individually
    ///
    /// Above this the report only carries the mismatch count.
    ///
    /// **Default**: 15
    pub word_list_limit: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            letter_report_limit: 8,
            word_list_limit: 15,
        }
    }
}
