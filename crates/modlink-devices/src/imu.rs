use crate::SharedGateway;
use modlink_core::{Capability, ModuleId};
use modlink_gateway::{GatewayError, Result};
use modlink_transport::Transport;

/// IMU module (accelerometer + gyroscope), raw readings.
pub struct Imu<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> Imu<T> {
    /// Bind an IMU facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Read the raw accelerometer components, in axis order.
    pub fn read_accel(&self) -> Result<Vec<f64>> {
        self.read_vector(Capability::Accelerometer)
    }

    /// Read the raw gyroscope components, in axis order.
    pub fn read_gyro(&self) -> Result<Vec<f64>> {
        self.read_vector(Capability::Gyroscope)
    }

    fn read_vector(&self, capability: Capability) -> Result<Vec<f64>> {
        let reading = self
            .gateway
            .borrow_mut()
            .read_capability(self.module, capability)?
            .ok_or(GatewayError::Unsupported { capability })?;
        match reading.as_vector() {
            Some(components) => Ok(components.to_vec()),
            None => Err(GatewayError::decode(format!(
                "{capability} read was not a vector"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share;
    use modlink_core::{CapabilityIndex, CatalogEntry, RawValue, constants::DEFAULT_MODULES};
    use modlink_gateway::{Gateway, GatewayConfig};
    use modlink_transport::{MockTransport, MockTransportHandle};

    fn setup(catalog: Vec<CatalogEntry>) -> (SharedGateway<MockTransport>, MockTransportHandle) {
        let (transport, handle) = MockTransport::new();
        handle.seed_catalog(catalog);
        let config =
            GatewayConfig::new("/dev/null").with_modules_override(DEFAULT_MODULES.to_vec());
        (share(Gateway::connect(transport, &config)), handle)
    }

    #[test]
    fn test_accel_vector() {
        let (gateway, handle) = setup(vec![
            CatalogEntry::new("AccelXYZ", CapabilityIndex::new(70)),
            CatalogEntry::new("GyroXYZ", CapabilityIndex::new(71)),
        ]);
        handle.set_register(
            CapabilityIndex::new(70),
            RawValue::Sequence(vec![0.0, 0.2, 9.8]),
        );

        let imu = Imu::new(gateway, ModuleId::new(5).unwrap());
        assert_eq!(imu.read_accel().unwrap(), vec![0.0, 0.2, 9.8]);
    }

    #[test]
    fn test_scalar_wraps_to_single_component() {
        let (gateway, handle) = setup(vec![
            CatalogEntry::new("AccelXYZ", CapabilityIndex::new(70)),
            CatalogEntry::new("GyroXYZ", CapabilityIndex::new(71)),
        ]);
        handle.set_register(CapabilityIndex::new(71), RawValue::Float(1.5));

        let imu = Imu::new(gateway, ModuleId::new(5).unwrap());
        assert_eq!(imu.read_gyro().unwrap(), vec![1.5]);
    }

    #[test]
    fn test_missing_imu_unsupported() {
        let (gateway, _handle) = setup(vec![]);
        let imu = Imu::new(gateway, ModuleId::new(5).unwrap());
        assert!(matches!(
            imu.read_accel(),
            Err(GatewayError::Unsupported { .. })
        ));
    }
}
