//! Frame encoding and deadline-bounded frame reads.

use std::io;
use std::time::Duration;

use tokio::time::{Instant, timeout};

use crate::core::constants::{FRAME_LENGTH_PREFIX_SIZE, MAX_FRAME_PAYLOAD};
use crate::core::error::ProtocolError;
use crate::core::traits::Transport;

/// Encode one frame: little-endian 16-bit length prefix followed by the
/// payload.
///
/// Fails with [`ProtocolError::PayloadTooLarge`] when the payload exceeds
/// [`MAX_FRAME_PAYLOAD`]; there is no fragmentation across frames.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(ProtocolError::PayloadTooLarge { len: payload.len() });
    }
    let mut frame = Vec::with_capacity(FRAME_LENGTH_PREFIX_SIZE + payload.len());
    frame.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Read exactly one frame from the transport, bounded by an overall deadline.
///
/// Both the length prefix and the payload are accumulated across partial
/// reads; transient `Interrupted` reads are retried. The transport closing
/// before the declared length is satisfied is a [`ProtocolError::ShortRead`];
/// the deadline expiring mid-frame is [`ProtocolError::ResponseTimeout`].
pub async fn read_frame<T: Transport>(
    transport: &mut T,
    deadline: Duration,
) -> Result<Vec<u8>, ProtocolError> {
    let expires = Instant::now() + deadline;

    let mut prefix = [0u8; FRAME_LENGTH_PREFIX_SIZE];
    read_exact_by(transport, &mut prefix, expires).await?;
    let len = u16::from_le_bytes(prefix) as usize;

    let mut payload = vec![0u8; len];
    read_exact_by(transport, &mut payload, expires).await?;
    Ok(payload)
}

async fn read_exact_by<T: Transport>(
    transport: &mut T,
    buf: &mut [u8],
    expires: Instant,
) -> Result<(), ProtocolError> {
    let mut filled = 0;
    while filled < buf.len() {
        let now = Instant::now();
        if expires <= now {
            return Err(ProtocolError::ResponseTimeout);
        }
        match timeout(expires - now, transport.read(&mut buf[filled..])).await {
            Err(_) => return Err(ProtocolError::ResponseTimeout),
            Ok(Ok(0)) => {
                return Err(ProtocolError::ShortRead {
                    expected: buf.len(),
                    actual: filled,
                });
            }
            Ok(Ok(n)) => filled += n,
            Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
            Ok(Err(e)) => return Err(ProtocolError::ReceiveFailed(e)),
        }
    }
    Ok(())
}
