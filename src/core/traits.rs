//! Capability traits supplied by the host environment.
//!
//! The link layer never touches a radio directly. The host provides a
//! [`Connector`] that opens stream transports, the [`Transport`]s themselves,
//! and a [`Discoverer`] wrapping the adapter's inquiry mechanism. Everything
//! above these seams is portable and testable with scripted doubles.
//!
//! Futures returned by these methods are driven directly by the calling
//! operation; dropping the operation's future cancels the capability call at
//! its current suspension point.

use std::io;
use std::time::Duration;

use super::address::{AddressParseError, BtAddress};
use super::error::{ConnectionError, DiscoveryError};

/// An open, connection-oriented stream to one device.
///
/// Exclusively owned by its registry record; the link layer serializes all
/// traffic per transport.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Read up to `buf.len()` bytes. `Ok(0)` signals that the peer closed the
    /// stream.
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write the whole buffer.
    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Wait until at least one byte can be read without blocking.
    ///
    /// The wait is unbounded; callers apply their own deadline.
    async fn readable(&mut self) -> io::Result<()>;

    /// Disable further sends and receives (bidirectional half-close).
    async fn shutdown(&mut self) -> io::Result<()>;

    /// Release the underlying socket.
    async fn close(&mut self) -> io::Result<()>;
}

/// Opens a fresh [`Transport`] to a device.
#[allow(async_fn_in_trait)]
pub trait Connector {
    /// The stream type this connector produces.
    type Transport: Transport;

    /// Open a new stream socket and connect it to `address` on the given
    /// RFCOMM channel.
    ///
    /// Implementations report [`ConnectionError::SocketCreateFailed`] when the
    /// socket cannot be created and [`ConnectionError::ConnectFailed`] when the
    /// connection is refused or unreachable. A failed or cancelled attempt
    /// must release any socket it created. The caller bounds the whole attempt
    /// with the configured connect timeout.
    async fn connect(
        &self,
        address: BtAddress,
        channel: u8,
    ) -> Result<Self::Transport, ConnectionError>;
}

/// Radio inquiry capability: finds nearby devices and resolves their names.
#[allow(async_fn_in_trait)]
pub trait Discoverer {
    /// Opaque raw inquiry response.
    type Candidate;

    /// Run a device inquiry for roughly `scan`, returning at most
    /// `max_responses` candidates.
    ///
    /// Implementations must flush the adapter's inquiry cache so that stale
    /// results from a previous scan cannot leak into this one.
    async fn inquire(
        &mut self,
        scan: Duration,
        max_responses: usize,
    ) -> Result<Vec<Self::Candidate>, DiscoveryError>;

    /// Resolve a candidate to its canonical hardware address.
    fn resolve_address(&self, candidate: &Self::Candidate)
    -> Result<BtAddress, AddressParseError>;

    /// Query the friendly display name of a device.
    ///
    /// The wait is unbounded; callers apply the configured name timeout and
    /// substitute a sentinel on failure.
    async fn remote_name(&mut self, address: BtAddress) -> io::Result<String>;
}
