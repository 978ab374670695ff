use crate::SharedGateway;
use modlink_core::OperationMode;
use modlink_gateway::Result;
use modlink_transport::Transport;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Brushed DC motor on the controller's integrated driver.
///
/// Unlike the slot-addressed add-on modules, the motor belongs to the
/// controller itself; its configuration lives in device-level registers.
/// Constructing the facade writes the encoder CPR immediately.
pub struct Motor<T: Transport> {
    gateway: SharedGateway<T>,
    cpr: u32,
}

impl<T: Transport> Motor<T> {
    /// Create a motor facade and configure the encoder counts per shaft
    /// revolution.
    ///
    /// # Errors
    /// Returns an error if the CPR write fails; the facade is not created
    /// in that case.
    pub fn new(gateway: SharedGateway<T>, cpr: u32) -> Result<Self> {
        gateway.borrow_mut().set_shaft_cpr(cpr)?;
        Ok(Self { gateway, cpr })
    }

    /// Configured encoder counts per revolution.
    #[must_use]
    pub fn cpr(&self) -> u32 {
        self.cpr
    }

    /// Set the velocity control loop gains.
    pub fn configure_velocity_control(&self, p: f32, i: f32, d: f32) -> Result<()> {
        self.gateway.borrow_mut().set_velocity_pid(p, i, d)
    }

    /// Set the position control loop gains.
    pub fn configure_position_control(&self, p: f32, i: f32, d: f32) -> Result<()> {
        self.gateway.borrow_mut().set_position_pid(p, i, d)
    }

    /// Set the torque control loop gains.
    pub fn configure_torque_control(&self, p: f32, i: f32, d: f32) -> Result<()> {
        self.gateway.borrow_mut().set_torque_pid(p, i, d)
    }

    /// Select the control mode.
    pub fn set_operation_mode(&self, mode: OperationMode) -> Result<()> {
        self.gateway.borrow_mut().set_operation_mode(mode)
    }

    /// Enable or disable torque.
    pub fn enable_torque(&self, enabled: bool) -> Result<()> {
        self.gateway.borrow_mut().enable_torque(enabled)
    }

    /// Set the velocity setpoint in RPM without touching mode or torque.
    pub fn set_shaft_rpm(&self, rpm: f32) -> Result<()> {
        self.gateway.borrow_mut().set_shaft_rpm(rpm)
    }

    /// Set the PWM duty cycle, -100..=100 percent.
    pub fn set_pwm(&self, duty: f32) -> Result<()> {
        self.gateway.borrow_mut().set_duty_cycle(duty)
    }

    /// Run open-loop at `duty` percent. With `hold` set, block for that
    /// long and then [`stop`](Motor::stop).
    pub fn run_pwm(&self, duty: f32, hold: Option<Duration>) -> Result<()> {
        self.set_operation_mode(OperationMode::Pwm)?;
        self.enable_torque(true)?;
        self.set_pwm(duty)?;
        if let Some(hold) = hold {
            thread::sleep(hold);
            self.stop();
        }
        Ok(())
    }

    /// Run closed-loop velocity control at `rpm`.
    pub fn run_velocity(&self, rpm: f32) -> Result<()> {
        self.set_operation_mode(OperationMode::Velocity)?;
        self.enable_torque(true)?;
        self.gateway.borrow_mut().set_shaft_rpm(rpm)
    }

    /// Run closed-loop position control toward `target` encoder ticks.
    pub fn run_position(&self, target: f32) -> Result<()> {
        self.set_operation_mode(OperationMode::Position)?;
        self.enable_torque(true)?;
        self.gateway.borrow_mut().set_position_setpoint(target)
    }

    /// Best-effort stop: zero the duty cycle and drop torque. Never
    /// errors; this is the path cleanup code takes, and a half-dead link
    /// must not keep it from trying both writes.
    pub fn stop(&self) {
        if let Err(e) = self.set_pwm(0.0) {
            debug!("Motor stop: duty write failed ({})", e);
        }
        if let Err(e) = self.enable_torque(false) {
            debug!("Motor stop: torque disable failed ({})", e);
        }
    }
}
