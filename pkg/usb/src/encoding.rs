//! Numeric helpers shared by the descriptor serializers.

use common::errors::*;

use crate::error::{Error, ErrorKind};

/// A (major, minor) version such as the bcdUSB, bcdDevice or bcdHID fields.
///
/// Each component is stored as two decimal digits so `(1, 11)` is "1.11".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Encodes the version as the two bytes of a little endian BCD field.
    ///
    /// The minor component comes first so `(1, 11)` becomes `[0x11, 0x01]`.
    pub fn to_bcd_bytes(&self) -> Result<[u8; 2]> {
        Ok([bcd(self.minor)?, bcd(self.major)?])
    }
}

impl From<(u8, u8)> for Version {
    fn from(v: (u8, u8)) -> Self {
        Self::new(v.0, v.1)
    }
}

/// Packs a number in the range 0-99 into one byte with the tens digit in the
/// upper nibble.
pub fn bcd(value: u8) -> Result<u8> {
    if value > 99 {
        return Err(Error::new(
            ErrorKind::InvalidVersion,
            format!("{} does not fit in two BCD digits", value),
        )
        .into());
    }

    Ok(((value / 10) << 4) | (value % 10))
}

/// Writes the final length of a record into its one byte bLength field.
pub fn patch_u8_length(data: &mut [u8], offset: usize, what: &str) -> Result<()> {
    let len = checked_u8_length(data.len(), what)?;
    data[offset] = len;
    Ok(())
}

/// Writes the final length of a record into a two byte little endian length
/// field such as wTotalLength.
pub fn patch_u16_length(data: &mut [u8], offset: usize, what: &str) -> Result<()> {
    let len = checked_u16_length(data.len(), what)?;
    data[offset..(offset + 2)].copy_from_slice(&len.to_le_bytes());
    Ok(())
}

pub fn checked_u8_length(len: usize, what: &str) -> Result<u8> {
    if len > u8::MAX as usize {
        return Err(Error::new(
            ErrorKind::LengthOverflow,
            format!("{} is {} bytes long which exceeds the limit of {}", what, len, u8::MAX),
        )
        .into());
    }

    Ok(len as u8)
}

pub fn checked_u16_length(len: usize, what: &str) -> Result<u16> {
    if len > u16::MAX as usize {
        return Err(Error::new(
            ErrorKind::LengthOverflow,
            format!("{} is {} bytes long which exceeds the limit of {}", what, len, u16::MAX),
        )
        .into());
    }

    Ok(len as u16)
}
