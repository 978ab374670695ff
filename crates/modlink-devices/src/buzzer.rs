use crate::SharedGateway;
use modlink_core::ModuleId;
use modlink_gateway::Result;
use modlink_transport::Transport;
use std::thread;
use std::time::Duration;

/// Buzzer module: tone, beep, and melody playback.
///
/// Playback helpers are scripted sleeps on the caller thread: good
/// enough for feedback chirps, not for timing-accurate music.
pub struct Buzzer<T: Transport> {
    gateway: SharedGateway<T>,
    module: ModuleId,
}

impl<T: Transport> Buzzer<T> {
    /// Bind a buzzer facade to a module slot.
    pub fn new(gateway: SharedGateway<T>, module: ModuleId) -> Self {
        Self { gateway, module }
    }

    /// Start a continuous tone at `freq_hz`.
    pub fn on(&self, freq_hz: u16) -> Result<()> {
        self.tone(freq_hz)
    }

    /// Stop the tone.
    pub fn off(&self) -> Result<()> {
        self.tone(0)
    }

    /// Beep `cycles` times at `freq_hz`, leaving the buzzer silent
    /// afterwards even if a write fails partway through.
    pub fn beep(
        &self,
        freq_hz: u16,
        duration: Duration,
        pause: Duration,
        cycles: u32,
    ) -> Result<()> {
        let result: Result<()> = (|| {
            for _ in 0..cycles {
                self.tone(freq_hz)?;
                thread::sleep(duration);
                self.tone(0)?;
                thread::sleep(pause);
            }
            Ok(())
        })();
        let off = self.off();
        result.and(off)
    }

    /// Play a sequence of (frequency, duration) notes with a fixed gap
    /// between them. A frequency of 0 is a rest.
    pub fn play(&self, melody: &[(u16, Duration)], inter_note: Duration) -> Result<()> {
        let result: Result<()> = (|| {
            for &(freq_hz, duration) in melody {
                self.tone(freq_hz)?;
                thread::sleep(duration);
                self.tone(0)?;
                thread::sleep(inter_note);
            }
            Ok(())
        })();
        let off = self.off();
        result.and(off)
    }

    fn tone(&self, freq_hz: u16) -> Result<()> {
        self.gateway
            .borrow_mut()
            .set_buzzer_tone(self.module, freq_hz)
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

    fn tones(handle: &MockTransportHandle) -> Vec<f32> {
        handle.writes().iter().map(|(_, b)| b[0].1).collect()
    }

    #[test]
    fn test_beep_silences_between_and_after() {
        let (gateway, handle) = setup();
        let buzzer = Buzzer::new(gateway, ModuleId::new(5).unwrap());

        buzzer
            .beep(600, Duration::ZERO, Duration::ZERO, 2)
            .unwrap();

        // on, off, on, off, final off
        assert_eq!(tones(&handle), vec![600.0, 0.0, 600.0, 0.0, 0.0]);
    }

    #[test]
    fn test_play_melody() {
        let (gateway, handle) = setup();
        let buzzer = Buzzer::new(gateway, ModuleId::new(5).unwrap());

        buzzer
            .play(
                &[(440, Duration::ZERO), (494, Duration::ZERO)],
                Duration::ZERO,
            )
            .unwrap();

        assert_eq!(tones(&handle), vec![440.0, 0.0, 494.0, 0.0, 0.0]);
    }
}
