//! The high-level link facade.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::connection::{BatchOutcome, ConnectionManager};
use crate::core::address::BtAddress;
use crate::core::error::{DiscoveryError, LinkError};
use crate::core::traits::{Connector, Discoverer};
use crate::discovery;
use crate::dispatch::CommandDispatcher;
use crate::registry::{self, SharedRegistry};

use super::config::LinkConfig;

/// A link from this controller to a fleet of remote robot devices.
///
/// Owns the device registry and all open transports for the lifetime of the
/// value; no state is persisted across processes. All operations are driven
/// by the caller and are cancelled by dropping their futures; every
/// suspension point is additionally bounded by a configured deadline.
pub struct RobotLink<C: Connector, D: Discoverer> {
    config: LinkConfig,
    registry: SharedRegistry<C::Transport>,
    manager: ConnectionManager<C>,
    dispatcher: CommandDispatcher<C::Transport>,
    discoverer: Mutex<D>,
}

impl<C: Connector, D: Discoverer> RobotLink<C, D> {
    /// Create a link over the host-supplied capabilities.
    pub fn new(connector: C, discoverer: D, config: LinkConfig) -> Self {
        let registry = registry::shared();
        let manager = ConnectionManager::new(
            connector,
            registry.clone(),
            config.channel,
            config.connect_timeout,
        );
        let dispatcher = CommandDispatcher::new(registry.clone(), config.read_deadline);
        Self {
            config,
            registry,
            manager,
            dispatcher,
            discoverer: Mutex::new(discoverer),
        }
    }

    /// The configuration this link was built with.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Scan for compatible devices, returning display names mapped to
    /// addresses.
    pub async fn discover(&self) -> Result<HashMap<String, BtAddress>, DiscoveryError> {
        let mut discoverer = self.discoverer.lock().await;
        discovery::discover(
            &mut *discoverer,
            self.config.scan_duration,
            self.config.max_inquiry_responses,
            self.config.name_timeout,
            self.config.vendor_prefix,
        )
        .await
    }

    /// Connect to each address, returning the success/failure partition.
    pub async fn connect(&self, addresses: &[BtAddress]) -> BatchOutcome {
        self.manager.connect_many(addresses).await
    }

    /// Disconnect from each address, returning the success/failure partition.
    pub async fn disconnect(&self, addresses: &[BtAddress]) -> BatchOutcome {
        self.manager.disconnect_many(addresses).await
    }

    /// Whether any device is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.manager.is_connected().await
    }

    /// Addresses of the currently connected devices, in connection order.
    pub async fn connected_devices(&self) -> Vec<BtAddress> {
        self.registry.read().await.addresses()
    }

    /// Send one command to one device, optionally waiting for its response.
    pub async fn send_command(
        &self,
        address: BtAddress,
        units: &[u16],
        want_response: bool,
    ) -> Result<Option<Vec<u16>>, LinkError> {
        self.dispatcher
            .send_command(address, units, want_response, self.config.response_timeout)
            .await
    }

    /// Send the same command to every connected device.
    ///
    /// Response-waiting is honored only when exactly one device is connected.
    pub async fn broadcast_command(
        &self,
        units: &[u16],
        want_response: bool,
    ) -> Result<Option<Vec<u16>>, LinkError> {
        self.dispatcher
            .broadcast_command(units, want_response, self.config.response_timeout)
            .await
    }

    /// Wait for one device-initiated message without sending anything.
    pub async fn wait_for_message(
        &self,
        address: BtAddress,
    ) -> Result<Option<Vec<u16>>, LinkError> {
        self.dispatcher
            .wait_for_message(address, self.config.response_timeout)
            .await
    }

    /// Tear the link down, disconnecting every device and releasing all open
    /// handles. Returns the per-device partition of the teardown.
    pub async fn shutdown(self) -> BatchOutcome {
        self.manager.disconnect_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        MockCandidate, MockConnector, MockDiscoverer, ReadStep, ScriptedTransport,
    };
    use crate::transport::{encode_frame, encode_message};
    use std::time::Duration;

    fn addr(s: &str) -> BtAddress {
        s.parse().unwrap()
    }

    fn test_config() -> LinkConfig {
        LinkConfig::builder()
            .connect_timeout(Duration::from_millis(50))
            .response_timeout(Duration::from_millis(30))
            .read_deadline(Duration::from_millis(100))
            .scan_duration(Duration::from_millis(10))
            .name_timeout(Duration::from_millis(20))
            .build()
    }

    fn test_link(connector: MockConnector) -> RobotLink<MockConnector, MockDiscoverer> {
        init_test_logging();
        RobotLink::new(connector, MockDiscoverer::default(), test_config())
    }

    fn init_test_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[tokio::test]
    async fn test_discover_through_facade() {
        init_test_logging();
        let mut discoverer = MockDiscoverer {
            candidates: vec![MockCandidate("00:16:53:00:00:01")],
            ..Default::default()
        };
        discoverer
            .names
            .insert(addr("00:16:53:00:00:01"), "rover".into());
        let link = RobotLink::new(MockConnector::default(), discoverer, test_config());

        let devices = link.discover().await.unwrap();
        assert_eq!(devices["rover"], addr("00:16:53:00:00:01"));
    }

    #[tokio::test]
    async fn test_connect_then_command_then_shutdown() {
        let a = addr("00:16:53:00:00:01");
        let connector = MockConnector::default();
        let mut transport = ScriptedTransport::silent();
        transport.push_read(ReadStep::Data(
            encode_frame(&encode_message(&[0x0002, 0x0000])).unwrap(),
        ));
        connector.stage(a, transport);
        let link = test_link(connector);

        let outcome = link.connect(&[a]).await;
        assert_eq!(outcome.succeeded, vec![a]);
        assert!(link.is_connected().await);
        assert_eq!(link.connected_devices().await, vec![a]);

        let response = link.send_command(a, &[0x0001, 0x0098], true).await.unwrap();
        assert_eq!(response, Some(vec![0x0002, 0x0000]));

        let teardown = link.shutdown().await;
        assert_eq!(teardown.succeeded, vec![a]);
    }

    #[tokio::test]
    async fn test_connect_partition_reported_whole() {
        let good = addr("AA:BB:CC:11:22:33");
        let bad = addr("AA:BB:CC:44:55:66");
        let mut connector = MockConnector::default();
        connector.refuse.insert(bad);
        let link = test_link(connector);

        let outcome = link.connect(&[good, bad]).await;

        assert_eq!(outcome.succeeded, vec![good]);
        assert_eq!(outcome.failed, vec![bad]);
    }

    #[tokio::test]
    async fn test_broadcast_policy_over_two_devices() {
        let a = addr("00:16:53:00:00:01");
        let b = addr("00:16:53:00:00:02");
        let connector = MockConnector::default();
        let mut ta = ScriptedTransport::silent();
        ta.push_read(ReadStep::Data(
            encode_frame(&encode_message(&[0x0001])).unwrap(),
        ));
        connector.stage(a, ta);
        let link = test_link(connector);
        link.connect(&[a, b]).await;

        // Data is queued on one device, but the two-device policy forces the
        // response wait off.
        let response = link.broadcast_command(&[0x0042], true).await.unwrap();
        assert_eq!(response, None);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_address_partition() {
        let unknown = addr("AA:BB:CC:00:00:00");
        let link = test_link(MockConnector::default());

        let outcome = link.disconnect(&[unknown]).await;

        assert!(outcome.succeeded.is_empty());
        assert_eq!(outcome.failed, vec![unknown]);
        assert!(!link.is_connected().await);
    }

    #[tokio::test]
    async fn test_wait_for_message_facade() {
        let a = addr("00:16:53:00:00:01");
        let connector = MockConnector::default();
        let mut transport = ScriptedTransport::silent();
        transport.push_read(ReadStep::Data(
            encode_frame(&encode_message(&[0x0700])).unwrap(),
        ));
        connector.stage(a, transport);
        let link = test_link(connector);
        link.connect(&[a]).await;

        let message = link.wait_for_message(a).await.unwrap();
        assert_eq!(message, Some(vec![0x0700]));

        // Nothing further queued: the next wait reports silence, not an error.
        let message = link.wait_for_message(a).await.unwrap();
        assert_eq!(message, None);
    }
}
