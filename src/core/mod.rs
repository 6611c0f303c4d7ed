//! Core types: hardware addresses, protocol constants, error taxonomy, and the
//! capability traits supplied by the host environment.

pub mod address;
pub mod constants;
pub mod error;
pub mod traits;

pub use address::{AddressParseError, BtAddress, Oui};
pub use error::{
    ConnectionError, DisconnectionError, DiscoveryError, LinkError, LinkResult, ProtocolError,
    RegistryError,
};
pub use traits::{Connector, Discoverer, Transport};
