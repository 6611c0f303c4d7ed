//! Protocol constants for the RFCOMM link layer.
//!
//! The wire-format values are fixed by deployed peer firmware and MUST NOT be
//! changed.

use std::time::Duration;

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// Size of the frame length prefix in bytes.
///
/// The prefix is an unsigned 16-bit integer in **little-endian** byte order.
/// This is a protocol constant: both peers must agree on it or every frame is
/// silently misread. Note the asymmetry with the application payload codec,
/// which is big-endian ([`crate::transport::encode_message`]).
pub const FRAME_LENGTH_PREFIX_SIZE: usize = 2;

/// Maximum payload carried by a single frame. There is no fragmentation across
/// frames.
pub const MAX_FRAME_PAYLOAD: usize = u16::MAX as usize;

/// RFCOMM channel every device listens on.
pub const RFCOMM_CHANNEL: u8 = 1;

// =============================================================================
// DISCOVERY
// =============================================================================

/// Ceiling on inquiry responses accepted per scan (transport-imposed).
pub const MAX_INQUIRY_RESPONSES: usize = 255;

/// Sentinel display name used when a remote-name query fails.
pub const UNKNOWN_DEVICE_NAME: &str = "[unknown]";

/// Vendor prefix of the supported robot hardware, used as the default
/// discovery filter.
pub const DEFAULT_VENDOR_OUI: [u8; 3] = [0x00, 0x16, 0x53];

// =============================================================================
// TIMING DEFAULTS
// =============================================================================

/// Default bound on a single connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default wait for a command response before giving up (a normal outcome,
/// not an error).
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default overall deadline for reading one complete frame once data has
/// started arriving.
pub const DEFAULT_READ_DEADLINE: Duration = Duration::from_secs(5);

/// Default inquiry scan duration.
pub const DEFAULT_SCAN_DURATION: Duration = Duration::from_secs(10);

/// Default bound on a single remote-name query.
pub const DEFAULT_NAME_TIMEOUT: Duration = Duration::from_secs(2);
