//! Link configuration.

use std::time::Duration;

use crate::core::address::Oui;
use crate::core::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_NAME_TIMEOUT, DEFAULT_READ_DEADLINE, DEFAULT_RESPONSE_TIMEOUT,
    DEFAULT_SCAN_DURATION, DEFAULT_VENDOR_OUI, MAX_INQUIRY_RESPONSES, RFCOMM_CHANNEL,
};

/// Configuration for a [`RobotLink`](super::RobotLink).
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// RFCOMM channel devices listen on.
    pub channel: u8,

    /// Bound on a single connection attempt.
    pub connect_timeout: Duration,

    /// Wait for a command response before reporting "no response".
    pub response_timeout: Duration,

    /// Overall deadline for reading one frame once data has started arriving.
    pub read_deadline: Duration,

    /// Inquiry scan duration.
    pub scan_duration: Duration,

    /// Bound on a single remote-name query.
    pub name_timeout: Duration,

    /// Ceiling on inquiry responses accepted per scan.
    pub max_inquiry_responses: usize,

    /// Vendor prefix kept by the discovery filter.
    pub vendor_prefix: Oui,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            channel: RFCOMM_CHANNEL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            read_deadline: DEFAULT_READ_DEADLINE,
            scan_duration: DEFAULT_SCAN_DURATION,
            name_timeout: DEFAULT_NAME_TIMEOUT,
            max_inquiry_responses: MAX_INQUIRY_RESPONSES,
            vendor_prefix: Oui::from_octets(DEFAULT_VENDOR_OUI),
        }
    }
}

impl LinkConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> LinkConfigBuilder {
        LinkConfigBuilder::new()
    }
}

/// Builder for [`LinkConfig`].
#[derive(Debug, Default)]
pub struct LinkConfigBuilder {
    config: LinkConfig,
}

impl LinkConfigBuilder {
    /// Create a builder seeded with the default configuration.
    pub fn new() -> Self {
        Self {
            config: LinkConfig::default(),
        }
    }

    /// Set the RFCOMM channel.
    pub fn channel(mut self, channel: u8) -> Self {
        self.config.channel = channel;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the response-wait timeout.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.config.response_timeout = timeout;
        self
    }

    /// Set the frame-read deadline.
    pub fn read_deadline(mut self, deadline: Duration) -> Self {
        self.config.read_deadline = deadline;
        self
    }

    /// Set the inquiry scan duration.
    pub fn scan_duration(mut self, duration: Duration) -> Self {
        self.config.scan_duration = duration;
        self
    }

    /// Set the remote-name query timeout.
    pub fn name_timeout(mut self, timeout: Duration) -> Self {
        self.config.name_timeout = timeout;
        self
    }

    /// Set the inquiry response ceiling.
    pub fn max_inquiry_responses(mut self, max: usize) -> Self {
        self.config.max_inquiry_responses = max;
        self
    }

    /// Set the discovery vendor prefix.
    pub fn vendor_prefix(mut self, prefix: Oui) -> Self {
        self.config.vendor_prefix = prefix;
        self
    }

    /// Finish building.
    pub fn build(self) -> LinkConfig {
        self.config
    }
}
