use crate::SharedGateway;
use modlink_core::ModuleId;
use modlink_gateway::Result;
use modlink_transport::Transport;

/// Digital push-button module.
///
/// # Examples
///
/// ```no_run
/// # use modlink_core::ModuleId;
/// # use modlink_devices::{Button, share};
/// # use modlink_gateway::{Gateway, GatewayConfig};
/// # let gateway = share(Gateway::open(&GatewayConfig::new("/dev/ttyUSB0")).unwrap());
/// let button = Button::new(gateway, ModuleId::new(5).unwrap());
/// if button.is_pressed().unwrap() {
///     println!("pressed");
/// }
/// ```
pub struct Button<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> Button<T> {
    /// Bind a button facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Whether the button is currently pressed.
    pub fn is_pressed(&self) -> Result<bool> {
        self.gateway.borrow_mut().get_button(self.module)
    }
}
