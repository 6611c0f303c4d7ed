//! Error taxonomy for the link layer.
//!
//! One enum per failure family, aggregated into [`LinkError`]. Multi-address
//! operations (connect, disconnect) never surface these directly for a single
//! address; they accumulate a success/failure partition instead. Registry
//! violations are always reported as typed errors, never as silent corruption.

use std::io;

use thiserror::Error;

use super::address::BtAddress;

/// Errors raised by the device discovery path.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The local Bluetooth adapter could not be opened.
    #[error("bluetooth adapter unavailable: {0}")]
    AdapterUnavailable(#[source] io::Error),

    /// The radio inquiry itself failed.
    #[error("device inquiry failed: {0}")]
    InquiryFailed(#[source] io::Error),
}

/// Errors raised while establishing a connection to a single device.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A stream socket could not be created.
    #[error("failed to create stream socket: {0}")]
    SocketCreateFailed(#[source] io::Error),

    /// The connection attempt was rejected or the device is unreachable.
    #[error("connection attempt failed: {0}")]
    ConnectFailed(#[source] io::Error),

    /// The connection attempt did not complete within the configured bound.
    #[error("connection attempt timed out")]
    Timeout,
}

/// Errors raised while tearing down a connection.
#[derive(Debug, Error)]
pub enum DisconnectionError {
    /// The bidirectional shutdown failed.
    #[error("transport shutdown failed: {0}")]
    ShutdownFailed(#[source] io::Error),

    /// Releasing the transport failed.
    #[error("transport close failed: {0}")]
    CloseFailed(#[source] io::Error),
}

/// Errors raised by the framing protocol and command exchange.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Writing a frame to the transport failed.
    #[error("failed to send command: {0}")]
    SendFailed(#[source] io::Error),

    /// Reading from the transport failed.
    #[error("failed to receive message: {0}")]
    ReceiveFailed(#[source] io::Error),

    /// The transport closed before the declared frame length was satisfied.
    #[error("transport closed after {actual} of {expected} bytes")]
    ShortRead {
        /// Bytes the frame declared.
        expected: usize,
        /// Bytes actually received.
        actual: usize,
    },

    /// The payload does not fit in a single frame.
    #[error("payload of {len} bytes exceeds the maximum frame payload")]
    PayloadTooLarge {
        /// Offending payload size.
        len: usize,
    },

    /// The frame-read deadline expired after data had started arriving.
    #[error("frame read deadline expired")]
    ResponseTimeout,
}

/// Errors raised by the device registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The address is not registered.
    #[error("device {0} is not registered")]
    NotFound(BtAddress),

    /// The address is already registered.
    #[error("device {0} is already registered")]
    DuplicateAddress(BtAddress),
}

/// Top-level link error.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Discovery error.
    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Disconnection error.
    #[error("disconnection error: {0}")]
    Disconnection(#[from] DisconnectionError),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Registry error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An operation that requires at least one connected device found none.
    #[error("no devices connected")]
    NotConnected,
}

/// Result type for link operations.
pub type LinkResult<T> = Result<T, LinkError>;
