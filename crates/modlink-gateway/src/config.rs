use modlink_core::{
    DeviceId, ModuleDescriptor,
    constants::{DEFAULT_BAUD_RATE, DEFAULT_SCAN_TIMEOUT_MS},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Construction parameters for a [`Gateway`](crate::Gateway).
///
/// Everything but the port has a sensible default; the `with_*` methods
/// chain for the rest.
///
/// # Examples
///
/// ```
/// use modlink_gateway::GatewayConfig;
/// use std::time::Duration;
///
/// let config = GatewayConfig::new("/dev/ttyUSB0")
///     .with_baud_rate(57_600)
///     .with_scan_timeout(Duration::from_millis(250));
///
/// assert_eq!(config.baud_rate, 57_600);
/// assert_eq!(config.device_id.as_u8(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Serial device path of the controller link.
    pub port: String,

    /// Link baud rate.
    pub baud_rate: u32,

    /// Controller address on the bus.
    pub device_id: DeviceId,

    /// Settle time granted to the firmware scan engine before the
    /// inventory query. A single attempt; never retried.
    pub scan_timeout: Duration,

    /// Explicit module list. When present, auto-scan is bypassed entirely
    /// and this list is registered verbatim.
    pub modules_override: Option<Vec<ModuleDescriptor>>,
}

impl GatewayConfig {
    /// Create a config for the given port with default parameters.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            device_id: DeviceId::default(),
            scan_timeout: Duration::from_millis(DEFAULT_SCAN_TIMEOUT_MS),
            modules_override: None,
        }
    }

    /// Set the link baud rate.
    #[must_use]
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the controller address.
    #[must_use]
    pub fn with_device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = device_id;
        self
    }

    /// Set the scan settle time.
    #[must_use]
    pub fn with_scan_timeout(mut self, scan_timeout: Duration) -> Self {
        self.scan_timeout = scan_timeout;
        self
    }

    /// Supply the module list explicitly, skipping auto-scan.
    #[must_use]
    pub fn with_modules_override(mut self, modules: Vec<ModuleDescriptor>) -> Self {
        self.modules_override = Some(modules);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_core::{ModuleId, ModuleKind};

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new("/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.device_id.as_u8(), 0);
        assert_eq!(config.scan_timeout, Duration::from_millis(100));
        assert!(config.modules_override.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let modules = vec![ModuleDescriptor::new(
            ModuleKind::Button,
            ModuleId::new(2).unwrap(),
        )];
        let config = GatewayConfig::new("COM3")
            .with_device_id(DeviceId::new(1).unwrap())
            .with_modules_override(modules.clone());

        assert_eq!(config.port, "COM3");
        assert_eq!(config.device_id.as_u8(), 1);
        assert_eq!(config.modules_override.as_deref(), Some(&modules[..]));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = GatewayConfig::new("/dev/ttyACM0").with_baud_rate(9_600);
        let json = serde_json::to_string(&config).unwrap();
        let back: GatewayConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
