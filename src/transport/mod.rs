//! Wire protocol: frame framing and the application payload codec.
//!
//! One frame carries exactly one encoded application message:
//!
//! ```text
//! +------------------+----------------------+
//! | Length           | Payload              |
//! | 2 bytes (LE16)   | Length bytes         |
//! +------------------+----------------------+
//! ```
//!
//! The payload itself is a sequence of unsigned 16-bit units encoded MSB-first
//! ([`encode_message`]/[`decode_message`]). The byte orders differ on purpose:
//! both are fixed protocol constants matched to deployed peer firmware.

mod frame;
mod message;

pub use frame::{encode_frame, read_frame};
pub use message::{decode_message, encode_message};
