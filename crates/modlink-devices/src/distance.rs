use crate::SharedGateway;
use modlink_core::ModuleId;
use modlink_gateway::Result;
use modlink_transport::Transport;

/// Ultrasonic distance sensor module.
pub struct DistanceSensor<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> DistanceSensor<T> {
    /// Bind a distance sensor facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Read the measured distance in centimeters.
    pub fn read_cm(&self) -> Result<f64> {
        self.gateway.borrow_mut().get_distance_cm(self.module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share;
    use modlink_core::{CapabilityIndex, RawValue, constants::DEFAULT_MODULES};
    use modlink_gateway::{Gateway, GatewayConfig};
    use modlink_transport::MockTransport;

    #[test]
    fn test_read_cm() {
        let (transport, handle) = MockTransport::new();
        handle.set_register(CapabilityIndex::new(0x0701), RawValue::Float(17.5));
        let config =
            GatewayConfig::new("/dev/null").with_modules_override(DEFAULT_MODULES.to_vec());
        let gateway = share(Gateway::connect(transport, &config));

        let sensor = DistanceSensor::new(gateway, ModuleId::new(1).unwrap());
        assert_eq!(sensor.read_cm().unwrap(), 17.5);
    }
}
