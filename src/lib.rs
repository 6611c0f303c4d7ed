//! # botlink
//!
//! Bluetooth RFCOMM link management and a framed binary command protocol for
//! fleets of remote robot devices. The crate provides:
//!
//! - **Device registry**: an insertion-ordered table of connected peers and
//!   their exclusively-owned transport handles
//! - **Frame codec**: a 16-bit length-prefixed wire format with
//!   partial-failure-tolerant send/receive semantics
//! - **Connection lifecycle**: sequential multi-device connect/disconnect that
//!   tolerates per-device failures without aborting the batch
//! - **Command dispatch**: single and broadcast commands with bounded
//!   response waits
//!
//! The radio itself stays outside the crate: the host supplies a
//! [`Connector`], its [`Transport`] streams, and a [`Discoverer`] via the
//! traits in [`core::traits`], which keeps the link layer portable and
//! testable.
//!
//! ## Modules
//!
//! - [`core`]: addresses, constants, errors, and capability traits
//! - [`registry`]: the device table
//! - [`transport`]: frame and payload codecs
//! - [`discovery`]: inquiry, vendor filtering, and name resolution
//! - [`connection`]: connect/disconnect lifecycle
//! - [`dispatch`]: command send/broadcast and response waits
//! - [`link`]: the high-level [`RobotLink`] facade
//!
//! ## Example Usage
//!
//! ```ignore
//! use botlink::prelude::*;
//!
//! let config = LinkConfig::builder()
//!     .vendor_prefix("00:16:53".parse()?)
//!     .build();
//! let link = RobotLink::new(connector, discoverer, config);
//!
//! let devices = link.discover().await?;
//! let addresses: Vec<_> = devices.values().copied().collect();
//! let outcome = link.connect(&addresses).await;
//!
//! // Drive the whole fleet, then ask the single straggler for status.
//! link.broadcast_command(&[0x0C01, 0x2000], false).await?;
//! let status = link.send_command(addresses[0], &[0x0005], true).await?;
//!
//! link.shutdown().await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod connection;
pub mod core;
pub mod discovery;
pub mod dispatch;
pub mod link;
pub mod registry;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::connection::{BatchOutcome, ConnectionManager};
    pub use crate::core::address::{AddressParseError, BtAddress, Oui};
    pub use crate::core::error::{
        ConnectionError, DisconnectionError, DiscoveryError, LinkError, LinkResult, ProtocolError,
        RegistryError,
    };
    pub use crate::core::traits::{Connector, Discoverer, Transport};
    pub use crate::dispatch::CommandDispatcher;
    pub use crate::link::{LinkConfig, LinkConfigBuilder, RobotLink};
    pub use crate::registry::{DeviceRecord, DeviceRegistry, LinkState, RecordId};
}

// Re-export commonly used items at crate root
pub use crate::connection::BatchOutcome;
pub use crate::core::address::{BtAddress, Oui};
pub use crate::core::error::{LinkError, LinkResult};
pub use crate::core::traits::{Connector, Discoverer, Transport};
pub use crate::link::{LinkConfig, RobotLink};
pub use crate::registry::DeviceRegistry;
