//! High-level link API.
//!
//! [`RobotLink`] wires the registry, connection manager, dispatcher, and
//! discoverer together behind the operation surface the host calls, driven by
//! an explicit [`LinkConfig`] created at startup.

mod config;
#[allow(clippy::module_inception)]
mod link;

pub use config::{LinkConfig, LinkConfigBuilder};
pub use link::RobotLink;
