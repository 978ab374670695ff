//! Error types for transport operations.

use thiserror::Error;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while talking to the controller.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The serial port could not be opened or failed mid-operation.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// A frame or payload failed to encode or decode.
    #[error("Protocol error: {0}")]
    Protocol(#[from] modlink_core::Error),

    /// Generic I/O error on the link.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No reply arrived within the serial read timeout.
    #[error("Reply timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The controller replied with something other than the expected frame.
    #[error("Unexpected reply: {message}")]
    UnexpectedReply { message: String },

    /// The controller rejected the command (Nack).
    #[error("Command rejected by controller")]
    Rejected,

    /// The transport was already closed.
    #[error("Transport is closed")]
    Closed,
}

impl TransportError {
    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new unexpected-reply error.
    pub fn unexpected_reply(message: impl Into<String>) -> Self {
        Self::UnexpectedReply {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let error = TransportError::timeout(500);
        assert_eq!(error.to_string(), "Reply timeout after 500ms");
    }

    #[test]
    fn test_unexpected_reply_display() {
        let error = TransportError::unexpected_reply("Ack to a read");
        assert_eq!(error.to_string(), "Unexpected reply: Ack to a read");
    }

    #[test]
    fn test_protocol_error_wraps_core() {
        let error: TransportError = modlink_core::Error::UnknownCommand(0x7F).into();
        assert!(matches!(error, TransportError::Protocol(_)));
    }
}
