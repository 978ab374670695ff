use crate::SharedGateway;
use modlink_core::{Capability, ModuleId};
use modlink_gateway::{GatewayError, Result};
use modlink_transport::Transport;

/// QTR reflectance sensor array (line following).
pub struct QtrArray<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> QtrArray<T> {
    /// Bind a QTR array facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Read the raw reflectance value of every sensor in the array.
    pub fn read_all(&self) -> Result<Vec<f64>> {
        let reading = self
            .gateway
            .borrow_mut()
            .read_capability(self.module, Capability::QtrRaw)?
            .ok_or(GatewayError::Unsupported {
                capability: Capability::QtrRaw,
            })?;
        match reading.as_vector() {
            Some(values) => Ok(values.to_vec()),
            None => Err(GatewayError::decode("qtr read was not a vector")),
        }
    }

    /// Read the firmware-computed line position estimate.
    pub fn read_position(&self) -> Result<f64> {
        let reading = self
            .gateway
            .borrow_mut()
            .read_capability(self.module, Capability::QtrPosition)?
            .ok_or(GatewayError::Unsupported {
                capability: Capability::QtrPosition,
            })?;
        reading
            .as_scalar()
            .ok_or_else(|| GatewayError::decode("qtr position read was not a scalar"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share;
    use modlink_core::{CapabilityIndex, CatalogEntry, RawValue, constants::DEFAULT_MODULES};
    use modlink_gateway::{Gateway, GatewayConfig};
    use modlink_transport::{MockTransport, MockTransportHandle};

    fn setup() -> (SharedGateway<MockTransport>, MockTransportHandle) {
        let (transport, handle) = MockTransport::new();
        handle.seed_catalog(vec![
            CatalogEntry::new("QTR_1", CapabilityIndex::new(50)),
            CatalogEntry::new("QTRPosition", CapabilityIndex::new(51)),
        ]);
        let config =
            GatewayConfig::new("/dev/null").with_modules_override(DEFAULT_MODULES.to_vec());
        (share(Gateway::connect(transport, &config)), handle)
    }

    #[test]
    fn test_read_all() {
        let (gateway, handle) = setup();
        handle.set_register(
            CapabilityIndex::new(50),
            RawValue::Sequence(vec![120.0, 880.0, 950.0, 140.0]),
        );

        let qtr = QtrArray::new(gateway, ModuleId::new(1).unwrap());
        assert_eq!(qtr.read_all().unwrap(), vec![120.0, 880.0, 950.0, 140.0]);
    }

    #[test]
    fn test_read_position() {
        let (gateway, handle) = setup();
        handle.set_register(CapabilityIndex::new(51), RawValue::Float(0.25));

        let qtr = QtrArray::new(gateway, ModuleId::new(1).unwrap());
        assert_eq!(qtr.read_position().unwrap(), 0.25);
    }
}
