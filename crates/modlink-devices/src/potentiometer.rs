use crate::SharedGateway;
use modlink_core::{Capability, ModuleId};
use modlink_gateway::{GatewayError, Result};
use modlink_transport::Transport;

/// Potentiometer module (analog input).
///
/// Reads go through the capability binding table; on a controller whose
/// catalog never exposed a potentiometer index, [`read`](Potentiometer::read)
/// returns [`GatewayError::Unsupported`] rather than touching the wire.
pub struct Potentiometer<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> Potentiometer<T> {
    /// Bind a potentiometer facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Read the current wiper value.
    pub fn read(&self) -> Result<f64> {
        let reading = self
            .gateway
            .borrow_mut()
            .read_capability(self.module, Capability::Potentiometer)?
            .ok_or(GatewayError::Unsupported {
                capability: Capability::Potentiometer,
            })?;
        reading
            .as_scalar()
            .ok_or_else(|| GatewayError::decode("potentiometer read was not a scalar"))
    }
}
