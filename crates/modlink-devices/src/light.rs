use crate::SharedGateway;
use modlink_core::ModuleId;
use modlink_gateway::Result;
use modlink_transport::Transport;

/// Ambient light sensor module.
pub struct LightSensor<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> LightSensor<T> {
    /// Bind a light sensor facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Read the ambient light level in lux.
    pub fn read_lux(&self) -> Result<f64> {
        self.gateway.borrow_mut().get_light_lux(self.module)
    }
}
