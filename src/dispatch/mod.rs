//! Command dispatch: framed sends, response waits, and the broadcast policy.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info};

use crate::core::address::BtAddress;
use crate::core::error::{LinkError, ProtocolError, RegistryError};
use crate::core::traits::Transport;
use crate::registry::SharedRegistry;
use crate::transport::{decode_message, encode_frame, encode_message, read_frame};

/// Sends commands to registered devices and collects their responses.
pub struct CommandDispatcher<T> {
    registry: SharedRegistry<T>,
    read_deadline: Duration,
}

impl<T: Transport> CommandDispatcher<T> {
    /// Create a dispatcher over `registry`. `read_deadline` bounds each frame
    /// read once response data has started arriving.
    pub fn new(registry: SharedRegistry<T>, read_deadline: Duration) -> Self {
        Self {
            registry,
            read_deadline,
        }
    }

    /// Send one command to one device.
    ///
    /// With `want_response`, waits up to `response_timeout` for the device to
    /// answer; no data arriving in time is a normal outcome reported as
    /// `Ok(None)`. I/O failures during the write or the response read
    /// propagate as errors without retry.
    pub async fn send_command(
        &self,
        address: BtAddress,
        units: &[u16],
        want_response: bool,
        response_timeout: Duration,
    ) -> Result<Option<Vec<u16>>, LinkError> {
        let handle = self
            .registry
            .read()
            .await
            .handle_of(address)
            .ok_or(RegistryError::NotFound(address))?;

        debug!(%address, units = units.len(), want_response, "sending command");
        let frame = encode_frame(&encode_message(units))?;
        let mut transport = handle.lock().await;
        self.exchange(&mut *transport, &frame, want_response, response_timeout)
            .await
    }

    /// Send the same command to every connected device, sequentially.
    ///
    /// A broadcast has no well-defined single responder, so response-waiting
    /// is honored only when exactly one device is connected; otherwise
    /// `want_response` is forced off regardless of the caller's request.
    /// Fails with [`LinkError::NotConnected`] when no device is connected.
    pub async fn broadcast_command(
        &self,
        units: &[u16],
        want_response: bool,
        response_timeout: Duration,
    ) -> Result<Option<Vec<u16>>, LinkError> {
        let handles = self.registry.read().await.connected_handles();
        if handles.is_empty() {
            return Err(LinkError::NotConnected);
        }
        let want_response = want_response && handles.len() == 1;

        info!(devices = handles.len(), want_response, "broadcasting command");
        let frame = encode_frame(&encode_message(units))?;
        let mut response = None;
        for handle in handles {
            let mut transport = handle.lock().await;
            response = self
                .exchange(&mut *transport, &frame, want_response, response_timeout)
                .await?;
        }
        Ok(response)
    }

    /// Wait for one device-initiated message without sending anything.
    ///
    /// Returns `Ok(None)` if nothing arrives within `wait`; otherwise reads
    /// and decodes exactly one frame.
    pub async fn wait_for_message(
        &self,
        address: BtAddress,
        wait: Duration,
    ) -> Result<Option<Vec<u16>>, LinkError> {
        let handle = self
            .registry
            .read()
            .await
            .handle_of(address)
            .ok_or(RegistryError::NotFound(address))?;

        let mut transport = handle.lock().await;
        match timeout(wait, transport.readable()).await {
            Err(_) => Ok(None),
            Ok(Err(err)) => Err(ProtocolError::ReceiveFailed(err).into()),
            Ok(Ok(())) => {
                let payload = read_frame(&mut *transport, self.read_deadline).await?;
                Ok(Some(decode_message(&payload)))
            }
        }
    }

    async fn exchange(
        &self,
        transport: &mut T,
        frame: &[u8],
        want_response: bool,
        response_timeout: Duration,
    ) -> Result<Option<Vec<u16>>, LinkError> {
        transport
            .write_all(frame)
            .await
            .map_err(ProtocolError::SendFailed)?;

        if !want_response {
            return Ok(None);
        }
        match timeout(response_timeout, transport.readable()).await {
            Err(_) => {
                debug!("no response before the deadline");
                Ok(None)
            }
            Ok(Err(err)) => Err(ProtocolError::ReceiveFailed(err).into()),
            Ok(Ok(())) => {
                let payload = read_frame(transport, self.read_deadline).await?;
                Ok(Some(decode_message(&payload)))
            }
        }
    }
}
