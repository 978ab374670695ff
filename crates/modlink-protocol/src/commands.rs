use modlink_core::{Error, Result};
use std::fmt;

/// Command byte of a wire frame.
///
/// The first five are host-initiated bus operations; `Ack`/`Nack` only
/// appear in controller replies to commands that carry no data back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandCode {
    /// Read one register; reply carries a tagged raw value.
    ReadIndex = 0x01,

    /// Write a batch of (register, value) pairs; reply is Ack.
    WriteIndex = 0x02,

    /// Fetch the firmware's index catalog.
    ListIndices = 0x03,

    /// Query the live module inventory (scan mode must be enabled first).
    ScanModules = 0x04,

    /// Register the connected module list with the firmware.
    SetModules = 0x05,

    /// Positive acknowledge, empty payload.
    Ack = 0x06,

    /// Negative acknowledge, empty payload.
    Nack = 0x07,
}

impl CommandCode {
    /// Get the wire byte for this command.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Parse a wire byte.
    ///
    /// # Errors
    /// Returns `Error::UnknownCommand` for bytes outside the command set.
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(Self::ReadIndex),
            0x02 => Ok(Self::WriteIndex),
            0x03 => Ok(Self::ListIndices),
            0x04 => Ok(Self::ScanModules),
            0x05 => Ok(Self::SetModules),
            0x06 => Ok(Self::Ack),
            0x07 => Ok(Self::Nack),
            other => Err(Error::UnknownCommand(other)),
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::ReadIndex => "ReadIndex",
            Self::WriteIndex => "WriteIndex",
            Self::ListIndices => "ListIndices",
            Self::ScanModules => "ScanModules",
            Self::SetModules => "SetModules",
            Self::Ack => "Ack",
            Self::Nack => "Nack",
        };
        write!(f, "{name}")
    }
}
