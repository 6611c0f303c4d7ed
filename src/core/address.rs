//! Canonical Bluetooth hardware addresses and vendor prefixes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Octet count of a full hardware address.
pub const ADDRESS_OCTETS: usize = 6;

/// Octet count of a vendor prefix (OUI).
pub const OUI_OCTETS: usize = 3;

/// A 6-octet Bluetooth hardware address.
///
/// The canonical textual form is `XX:XX:XX:XX:XX:XX`. Parsing accepts either
/// case; equality and hashing operate on the raw octets, so comparison is
/// case-insensitive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BtAddress([u8; ADDRESS_OCTETS]);

impl BtAddress {
    /// Create an address from raw octets.
    pub fn from_octets(octets: [u8; ADDRESS_OCTETS]) -> Self {
        Self(octets)
    }

    /// Get the raw octets.
    pub fn octets(&self) -> &[u8; ADDRESS_OCTETS] {
        &self.0
    }

    /// The vendor prefix: the first three octets of the address.
    pub fn oui(&self) -> Oui {
        Oui([self.0[0], self.0[1], self.0[2]])
    }
}

impl fmt::Display for BtAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for BtAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_octets(s).map(Self)
    }
}

/// A 3-octet Organizationally Unique Identifier, used as a vendor filter.
///
/// Textual form `XX:XX:XX`, parsed case-insensitively like [`BtAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Oui([u8; OUI_OCTETS]);

impl Oui {
    /// Create a prefix from raw octets.
    pub fn from_octets(octets: [u8; OUI_OCTETS]) -> Self {
        Self(octets)
    }

    /// Get the raw octets.
    pub fn octets(&self) -> &[u8; OUI_OCTETS] {
        &self.0
    }
}

impl fmt::Display for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}:{:02X}:{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Oui {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_octets(s).map(Self)
    }
}

/// Errors parsing a textual hardware address or vendor prefix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// Wrong number of colon-separated octets.
    #[error("expected {expected} colon-separated octets, got {actual}")]
    WrongLength {
        /// Octets required by the target type.
        expected: usize,
        /// Octets found in the input.
        actual: usize,
    },

    /// An octet was not two hexadecimal digits.
    #[error("invalid octet {octet:?}")]
    InvalidOctet {
        /// The offending component.
        octet: String,
    },
}

fn parse_octets<const N: usize>(s: &str) -> Result<[u8; N], AddressParseError> {
    let mut out = [0u8; N];
    let mut count = 0;
    for part in s.split(':') {
        if count < N {
            if part.len() != 2 {
                return Err(AddressParseError::InvalidOctet {
                    octet: part.to_string(),
                });
            }
            out[count] =
                u8::from_str_radix(part, 16).map_err(|_| AddressParseError::InvalidOctet {
                    octet: part.to_string(),
                })?;
        }
        count += 1;
    }
    if count != N {
        return Err(AddressParseError::WrongLength {
            expected: N,
            actual: count,
        });
    }
    Ok(out)
}
