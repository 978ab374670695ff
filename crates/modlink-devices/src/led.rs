use crate::SharedGateway;
use modlink_core::ModuleId;
use modlink_gateway::Result;
use modlink_transport::Transport;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// RGB LED module.
pub struct Led<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> Led<T> {
    /// Bind an LED facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Set the LED color.
    pub fn on(&self, r: u8, g: u8, b: u8) -> Result<()> {
        self.gateway.borrow_mut().set_rgb(self.module, r, g, b)
    }

    /// Turn the LED off.
    pub fn off(&self) -> Result<()> {
        self.on(0, 0, 0)
    }

    /// Blink between two colors for a number of cycles, half a period per
    /// color, and leave the LED off afterwards, also when a write fails
    /// partway through.
    ///
    /// Blocking and not cancellable; the sleeps run on the caller thread.
    pub fn blink(
        &self,
        on_rgb: (u8, u8, u8),
        off_rgb: (u8, u8, u8),
        period: Duration,
        cycles: u32,
    ) -> Result<()> {
        debug!(
            "Blinking module {}: on={:?} off={:?} period={:?} cycles={}",
            self.module, on_rgb, off_rgb, period, cycles
        );
        let result = self.run_blink(on_rgb, off_rgb, period, cycles);
        let off = self.off();
        result.and(off)
    }

    fn run_blink(
        &self,
        on_rgb: (u8, u8, u8),
        off_rgb: (u8, u8, u8),
        period: Duration,
        cycles: u32,
    ) -> Result<()> {
        for _ in 0..cycles {
            self.on(on_rgb.0, on_rgb.1, on_rgb.2)?;
            thread::sleep(period);
            self.on(off_rgb.0, off_rgb.1, off_rgb.2)?;
            thread::sleep(period);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share;
    use modlink_core::constants::DEFAULT_MODULES;
    use modlink_gateway::{Gateway, GatewayConfig};
    use modlink_transport::{MockTransport, MockTransportHandle};

    fn setup() -> (SharedGateway<MockTransport>, MockTransportHandle) {
        let (transport, handle) = MockTransport::new();
        let config =
            GatewayConfig::new("/dev/null").with_modules_override(DEFAULT_MODULES.to_vec());
        (share(Gateway::connect(transport, &config)), handle)
    }

    fn channel_values(batch: &[(modlink_core::CapabilityIndex, f32)]) -> Vec<f32> {
        batch.iter().map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_on_off_write_literal_triples() {
        let (gateway, handle) = setup();
        let led = Led::new(gateway, ModuleId::new(5).unwrap());

        led.on(255, 0, 0).unwrap();
        led.off().unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(channel_values(&writes[0].1), vec![255.0, 0.0, 0.0]);
        assert_eq!(channel_values(&writes[1].1), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_blink_ends_dark() {
        let (gateway, handle) = setup();
        let led = Led::new(gateway, ModuleId::new(5).unwrap());

        led.blink((10, 20, 30), (0, 0, 0), Duration::ZERO, 2).unwrap();

        let writes = handle.writes();
        // 2 cycles * 2 phases + final off
        assert_eq!(writes.len(), 5);
        assert_eq!(
            channel_values(&writes.last().unwrap().1),
            vec![0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_blink_failure_still_attempts_off() {
        let (gateway, handle) = setup();
        let led = Led::new(gateway, ModuleId::new(5).unwrap());

        handle.fail_writes();
        assert!(led.blink((1, 1, 1), (0, 0, 0), Duration::ZERO, 1).is_err());

        // The on-phase write and the final off were both attempted.
        assert_eq!(handle.writes().len(), 2);
    }
}
