use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the modlink stack.
///
/// Frame and payload decoding errors originate in `modlink-protocol`;
/// identifier validation errors originate wherever ids are parsed.
#[derive(Error, Debug)]
pub enum Error {
    // Frame errors
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Unknown command code: {0:#04x}")]
    UnknownCommand(u8),

    // Payload errors
    #[error("Unknown value tag: {0:#04x}")]
    UnknownValueTag(u8),

    #[error("Truncated payload: {message}")]
    TruncatedPayload { message: String },

    #[error("Payload too large: {length} bytes (max {max})")]
    PayloadTooLarge { length: usize, max: usize },

    // Identifier errors
    #[error("Invalid device id: {0}")]
    InvalidDeviceId(u8),

    #[error("Invalid module id: {0}")]
    InvalidModuleId(u8),

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Unknown capability: {0}")]
    UnknownCapability(String),
}

impl Error {
    /// Create a new invalid frame error.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    /// Create a new truncated payload error.
    pub fn truncated(message: impl Into<String>) -> Self {
        Self::TruncatedPayload {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_frame_display() {
        let error = Error::invalid_frame("missing start byte");
        assert_eq!(error.to_string(), "Invalid frame: missing start byte");
    }

    #[test]
    fn test_checksum_mismatch_display() {
        let error = Error::ChecksumMismatch {
            expected: 0x12,
            actual: 0x34,
        };
        assert_eq!(
            error.to_string(),
            "Checksum mismatch: expected 0x12, got 0x34"
        );
    }

    #[test]
    fn test_unknown_command_display() {
        let error = Error::UnknownCommand(0xFF);
        assert_eq!(error.to_string(), "Unknown command code: 0xff");
    }
}
