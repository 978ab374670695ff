use modlink_core::Capability;
use modlink_transport::TransportError;
use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by the gateway facade and the device facades above it.
///
/// A transport failure invalidates nothing: it belongs to the one call
/// that hit it, and the gateway stays usable.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The underlying link errored on this call.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The capability was never bound on this controller.
    #[error("Capability not supported by this controller: {capability}")]
    Unsupported { capability: Capability },

    /// The register returned a payload shape this operation cannot use.
    #[error("Unexpected register payload: {message}")]
    Decode { message: String },
}

impl GatewayError {
    /// Create a new unsupported-capability error.
    pub fn unsupported(capability: Capability) -> Self {
        Self::Unsupported { capability }
    }

    /// Create a new decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display() {
        let error = GatewayError::unsupported(Capability::Potentiometer);
        assert_eq!(
            error.to_string(),
            "Capability not supported by this controller: potentiometer"
        );
    }

    #[test]
    fn test_transport_error_chains() {
        let error: GatewayError = TransportError::Rejected.into();
        assert!(matches!(error, GatewayError::Transport(_)));
    }
}
