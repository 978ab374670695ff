//! Device facades: one thin, typed wrapper per add-on module.
//!
//! Each facade binds to one module id and calls through the shared
//! [`Gateway`]. Facades never talk to the transport themselves and hold
//! no hardware state; constructing one against a slot that carries no
//! module succeeds, and the operation fails at call time instead.
//!
//! The gateway is shared between facades with
//! [`SharedGateway`] (`Rc<RefCell<…>>`), matching the single-caller-thread
//! model: one request in flight, calls never nest, no locking.
//!
//! # Example
//!
//! ```
//! use modlink_core::ModuleId;
//! use modlink_devices::{Button, Led, share};
//! use modlink_gateway::{Gateway, GatewayConfig};
//! use modlink_transport::MockTransport;
//!
//! let (transport, _handle) = MockTransport::new();
//! let gateway = share(Gateway::connect(transport, &GatewayConfig::new("/dev/ttyUSB0")));
//!
//! let _button = Button::new(gateway.clone(), ModuleId::new(5).unwrap());
//! let led = Led::new(gateway.clone(), ModuleId::new(5).unwrap());
//! led.on(255, 255, 255).unwrap();
//! ```

mod button;
mod buzzer;
mod distance;
mod imu;
mod joystick;
mod led;
mod light;
mod motor;
mod potentiometer;
mod qtr;

pub use button::Button;
pub use buzzer::Buzzer;
pub use distance::DistanceSensor;
pub use imu::Imu;
pub use joystick::Joystick;
pub use led::Led;
pub use light::LightSensor;
pub use motor::Motor;
pub use potentiometer::Potentiometer;
pub use qtr::QtrArray;

use modlink_gateway::Gateway;
use modlink_transport::Transport;
use std::cell::RefCell;
use std::rc::Rc;

/// A gateway shared between device facades on one caller thread.
pub type SharedGateway<T> = Rc<RefCell<Gateway<T>>>;

/// Wrap a gateway for sharing between facades.
pub fn share<T: Transport>(gateway: Gateway<T>) -> SharedGateway<T> {
    Rc::new(RefCell::new(gateway))
}
