//! Connection lifecycle: sequential connect/disconnect with partial-failure
//! tolerance.
//!
//! Addresses are processed one at a time on purpose: connection attempts are
//! radio-serialized to avoid multi-connect races on shared stream-socket
//! channels. One address's failure never aborts the rest; callers always get
//! the full success/failure partition back.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{error, info};

use crate::core::address::BtAddress;
use crate::core::error::{ConnectionError, DisconnectionError, LinkError, RegistryError};
use crate::core::traits::{Connector, Transport};
use crate::registry::{SharedHandle, SharedRegistry};

/// Per-address partition returned by multi-address operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Addresses for which the operation succeeded, in processing order.
    pub succeeded: Vec<BtAddress>,
    /// Addresses for which the operation failed, in processing order.
    pub failed: Vec<BtAddress>,
}

impl BatchOutcome {
    /// Whether every address succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns the connect/disconnect lifecycle for all devices.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    registry: SharedRegistry<C::Transport>,
    channel: u8,
    connect_timeout: Duration,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager driving `connector` and recording connections in
    /// `registry`.
    pub fn new(
        connector: C,
        registry: SharedRegistry<C::Transport>,
        channel: u8,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            connector,
            registry,
            channel,
            connect_timeout,
        }
    }

    /// Connect to each address in turn, registering the devices that accept.
    pub async fn connect_many(&self, addresses: &[BtAddress]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for &address in addresses {
            match self.connect_one(address).await {
                Ok(()) => {
                    info!(%address, "connected");
                    outcome.succeeded.push(address);
                }
                Err(err) => {
                    error!(%address, %err, "connect failed");
                    outcome.failed.push(address);
                }
            }
        }
        outcome
    }

    async fn connect_one(&self, address: BtAddress) -> Result<(), LinkError> {
        let transport = match timeout(
            self.connect_timeout,
            self.connector.connect(address, self.channel),
        )
        .await
        {
            Ok(Ok(transport)) => transport,
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => return Err(ConnectionError::Timeout.into()),
        };

        let handle: SharedHandle<C::Transport> = Arc::new(Mutex::new(transport));
        if let Err(err) = self
            .registry
            .write()
            .await
            .register(address, handle.clone())
        {
            // A transport that cannot be registered must not leak.
            let _ = handle.lock().await.close().await;
            return Err(err.into());
        }
        Ok(())
    }

    /// Disconnect each address in turn.
    ///
    /// Unknown addresses land in the failure partition without touching the
    /// rest of the registry. Known devices are unregistered unconditionally at
    /// the end of the attempt, whether or not the transport teardown
    /// succeeded.
    pub async fn disconnect_many(&self, addresses: &[BtAddress]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for &address in addresses {
            match self.disconnect_one(address).await {
                Ok(()) => {
                    info!(%address, "disconnected");
                    outcome.succeeded.push(address);
                }
                Err(err) => {
                    error!(%address, %err, "disconnect failed");
                    outcome.failed.push(address);
                }
            }
        }
        outcome
    }

    async fn disconnect_one(&self, address: BtAddress) -> Result<(), LinkError> {
        let handle = self
            .registry
            .read()
            .await
            .handle_of(address)
            .ok_or(RegistryError::NotFound(address))?;

        let teardown = {
            let mut transport = handle.lock().await;
            let shutdown = transport
                .shutdown()
                .await
                .map_err(DisconnectionError::ShutdownFailed);
            let close = transport
                .close()
                .await
                .map_err(DisconnectionError::CloseFailed);
            shutdown.and(close)
        };

        // The record never survives a disconnect attempt, even when the
        // teardown failed.
        let _ = self.registry.write().await.unregister(address);
        teardown.map_err(Into::into)
    }

    /// Disconnect every registered device, releasing all open handles.
    pub async fn disconnect_all(&self) -> BatchOutcome {
        let addresses = self.registry.read().await.addresses();
        self.disconnect_many(&addresses).await
    }

    /// Whether any device is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.registry.read().await.is_any_connected()
    }
}
