use crate::SharedGateway;
use modlink_core::{Capability, ModuleId};
use modlink_gateway::{GatewayError, Result};
use modlink_transport::Transport;

/// Joystick module: X/Y axes and a push-button.
///
/// Axes arrive either as a two-component sequence or, from firmware that
/// packs both into one word, as a split high/low byte pair. The binding
/// layer handles both; the facade just sees `(x, y)`.
pub struct Joystick<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> Joystick<T> {
    /// Bind a joystick facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Read the raw X and Y axis values.
    pub fn read_axes(&self) -> Result<(f64, f64)> {
        let reading = self
            .gateway
            .borrow_mut()
            .read_capability(self.module, Capability::JoystickAxes)?
            .ok_or(GatewayError::Unsupported {
                capability: Capability::JoystickAxes,
            })?;
        reading
            .as_pair()
            .ok_or_else(|| GatewayError::decode("joystick axes read was not an (x, y) pair"))
    }

    /// Whether the stick's push-button is pressed.
    pub fn is_pressed(&self) -> Result<bool> {
        let reading = self
            .gateway
            .borrow_mut()
            .read_capability(self.module, Capability::JoystickButton)?
            .ok_or(GatewayError::Unsupported {
                capability: Capability::JoystickButton,
            })?;
        reading
            .as_flag()
            .ok_or_else(|| GatewayError::decode("joystick button read was not a flag"))
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
            CatalogEntry::new("Joy_5", CapabilityIndex::new(60)),
            CatalogEntry::new("JoyButton_5", CapabilityIndex::new(61)),
        ]);
        let config =
            GatewayConfig::new("/dev/null").with_modules_override(DEFAULT_MODULES.to_vec());
        (share(Gateway::connect(transport, &config)), handle)
    }

    #[test]
    fn test_axes_from_sequence() {
        let (gateway, handle) = setup();
        handle.set_register(
            CapabilityIndex::new(60),
            RawValue::Sequence(vec![120.0, 200.0]),
        );

        let joystick = Joystick::new(gateway, ModuleId::new(5).unwrap());
        assert_eq!(joystick.read_axes().unwrap(), (120.0, 200.0));
    }

    #[test]
    fn test_axes_from_packed_word() {
        let (gateway, handle) = setup();
        handle.set_register(CapabilityIndex::new(60), RawValue::Integer(0x0102));

        let joystick = Joystick::new(gateway, ModuleId::new(5).unwrap());
        assert_eq!(joystick.read_axes().unwrap(), (1.0, 2.0));
    }

    #[test]
    fn test_button() {
        let (gateway, handle) = setup();
        handle.set_register(CapabilityIndex::new(61), RawValue::Integer(1));

        let joystick = Joystick::new(gateway, ModuleId::new(5).unwrap());
        assert!(joystick.is_pressed().unwrap());
    }
}
