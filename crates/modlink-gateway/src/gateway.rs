//! The gateway facade.

use crate::{
    binder::{self, BindingTable},
    config::GatewayConfig,
    discovery::{self, ModuleSource},
    error::{GatewayError, Result},
};
use modlink_core::{
    Capability, CapabilityIndex, DeviceId, ModuleDescriptor, ModuleId, OperationMode, RawValue,
    Reading,
    constants::{
        BANK_BUTTON, BANK_BUZZER, BANK_DISTANCE, BANK_LIGHT, BANK_RGB_BLUE, BANK_RGB_GREEN,
        BANK_RGB_RED, REG_MOTOR_DUTY_CYCLE, REG_MOTOR_GOAL_POSITION, REG_MOTOR_GOAL_VELOCITY,
        REG_MOTOR_OPERATION_MODE, REG_MOTOR_POSITION_D, REG_MOTOR_POSITION_I, REG_MOTOR_POSITION_P,
        REG_MOTOR_SHAFT_CPR, REG_MOTOR_TORQUE_D, REG_MOTOR_TORQUE_ENABLE, REG_MOTOR_TORQUE_I,
        REG_MOTOR_TORQUE_P, REG_MOTOR_VELOCITY_D, REG_MOTOR_VELOCITY_I, REG_MOTOR_VELOCITY_P,
        module_register,
    },
};
use modlink_transport::{SerialTransport, Transport};
use tracing::{debug, info, trace, warn};

/// Mediates all module access over one transport link.
///
/// Constructed once per controller: the module list and capability
/// binding table are established during construction and immutable for
/// the gateway's lifetime; there is no re-scan API. After that the
/// gateway is a stateless pass-through: every accessor issues one
/// blocking request on the exclusively-owned transport.
///
/// Construction degrades instead of failing: an unreachable catalog
/// disables the optional capabilities, a dead scan subsystem yields the
/// default module layout. The gateway that comes back is always usable.
///
/// # Examples
///
/// ```
/// use modlink_core::{Capability, ModuleId};
/// use modlink_gateway::{Gateway, GatewayConfig};
/// use modlink_transport::MockTransport;
///
/// let (transport, _handle) = MockTransport::new();
/// let mut gateway = Gateway::connect(transport, &GatewayConfig::new("/dev/ttyUSB0"));
///
/// let module = ModuleId::new(5).unwrap();
/// gateway.set_rgb(module, 255, 0, 0).unwrap();
/// gateway.close();
/// ```
pub struct Gateway<T: Transport> {
    transport: T,
    device_id: DeviceId,
    modules: Vec<ModuleDescriptor>,
    module_source: ModuleSource,
    bindings: BindingTable,
    closed: bool,
}

impl Gateway<SerialTransport> {
    /// Open the serial port named in the config and connect a gateway
    /// over it.
    ///
    /// # Errors
    /// Returns an error only if the port itself cannot be opened;
    /// everything past that degrades (see [`Gateway::connect`]).
    pub fn open(config: &GatewayConfig) -> Result<Self> {
        let transport = SerialTransport::open(&config.port, config.baud_rate)?;
        Ok(Self::connect(transport, config))
    }
}

impl<T: Transport> Gateway<T> {
    /// Connect a gateway over an already-constructed transport.
    ///
    /// Runs the full construction sequence: attach the protocol, fetch
    /// the index catalog, build the capability binding table, discover
    /// modules (override or auto-scan with default fallback), and
    /// register the chosen list with the firmware. Every step degrades
    /// with a diagnostic rather than failing, so this never errors.
    pub fn connect(mut transport: T, config: &GatewayConfig) -> Self {
        let device_id = config.device_id;

        if let Err(e) = transport.attach_protocol(device_id) {
            warn!("Protocol attach failed ({}); continuing", e);
        }

        let catalog = match transport.list_capability_indices() {
            Ok(catalog) => {
                debug!("Catalog lists {} indices", catalog.len());
                catalog
            }
            Err(e) => {
                warn!(
                    "Index catalog unavailable ({}); all optional capabilities disabled",
                    e
                );
                Vec::new()
            }
        };
        let bindings = BindingTable::build(&catalog);

        let report = discovery::discover(
            &mut transport,
            device_id,
            config.scan_timeout,
            config.modules_override.as_deref(),
        );

        match transport.set_connected_modules(device_id, &report.modules) {
            Ok(()) => info!(
                "Registered {} modules with device {}",
                report.modules.len(),
                device_id
            ),
            Err(e) => warn!("Module registration failed ({}); continuing", e),
        }

        Self {
            transport,
            device_id,
            modules: report.modules,
            module_source: report.source,
            bindings,
            closed: false,
        }
    }

    /// Controller address this gateway talks to.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Modules registered at construction, in registration order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Where the registered module list came from.
    #[must_use]
    pub fn module_source(&self) -> ModuleSource {
        self.module_source
    }

    /// The capability binding table established at construction.
    #[must_use]
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    // --- capability reads ------------------------------------------------

    /// Read one logical capability for a module.
    ///
    /// Returns `Ok(None)` when the capability never bound on this
    /// controller: an expected state, distinguishable from a call-time
    /// failure, which surfaces as `Err` and leaves the gateway and every
    /// other binding intact.
    pub fn read_capability(
        &mut self,
        module: ModuleId,
        capability: Capability,
    ) -> Result<Option<Reading>> {
        let Some(binding) = self.bindings.get(capability) else {
            return Ok(None);
        };
        trace!("Reading {} for module {}", capability, module);
        let raw = self.transport.read_index(self.device_id, binding.index)?;
        Ok(Some(binder::decode(binding.kind, raw)))
    }

    // --- fixed-register pass-throughs ------------------------------------
    //
    // These registers are part of every controller's wire protocol and
    // are not gated by the capability catalog.

    /// Set an RGB LED module's color. One write command carrying the
    /// three channel values.
    pub fn set_rgb(&mut self, module: ModuleId, r: u8, g: u8, b: u8) -> Result<()> {
        self.transport.write_index(
            self.device_id,
            &[
                (module_register(BANK_RGB_RED, module), f32::from(r)),
                (module_register(BANK_RGB_GREEN, module), f32::from(g)),
                (module_register(BANK_RGB_BLUE, module), f32::from(b)),
            ],
        )?;
        Ok(())
    }

    /// Set a buzzer module's tone frequency in Hz; 0 silences it.
    pub fn set_buzzer_tone(&mut self, module: ModuleId, freq_hz: u16) -> Result<()> {
        self.transport.write_index(
            self.device_id,
            &[(module_register(BANK_BUZZER, module), f32::from(freq_hz))],
        )?;
        Ok(())
    }

    /// Read a distance sensor module, in centimeters.
    pub fn get_distance_cm(&mut self, module: ModuleId) -> Result<f64> {
        let raw = self
            .transport
            .read_index(self.device_id, module_register(BANK_DISTANCE, module))?;
        scalar_of(raw)
    }

    /// Read a button module's pressed state.
    pub fn get_button(&mut self, module: ModuleId) -> Result<bool> {
        let raw = self
            .transport
            .read_index(self.device_id, module_register(BANK_BUTTON, module))?;
        Ok(raw.is_truthy())
    }

    /// Read an ambient light sensor module, in lux.
    pub fn get_light_lux(&mut self, module: ModuleId) -> Result<f64> {
        let raw = self
            .transport
            .read_index(self.device_id, module_register(BANK_LIGHT, module))?;
        scalar_of(raw)
    }

    // --- motor configuration ---------------------------------------------

    /// Configure the encoder counts per shaft revolution.
    pub fn set_shaft_cpr(&mut self, cpr: u32) -> Result<()> {
        self.write_one(REG_MOTOR_SHAFT_CPR, cpr as f32)
    }

    /// Set the velocity setpoint in RPM.
    pub fn set_shaft_rpm(&mut self, rpm: f32) -> Result<()> {
        self.write_one(REG_MOTOR_GOAL_VELOCITY, rpm)
    }

    /// Set the position setpoint in encoder ticks.
    pub fn set_position_setpoint(&mut self, position: f32) -> Result<()> {
        self.write_one(REG_MOTOR_GOAL_POSITION, position)
    }

    /// Select the motor control mode.
    pub fn set_operation_mode(&mut self, mode: OperationMode) -> Result<()> {
        self.write_one(REG_MOTOR_OPERATION_MODE, f32::from(mode.register_value()))
    }

    /// Set the velocity control loop gains.
    pub fn set_velocity_pid(&mut self, p: f32, i: f32, d: f32) -> Result<()> {
        self.transport.write_index(
            self.device_id,
            &[
                (REG_MOTOR_VELOCITY_P, p),
                (REG_MOTOR_VELOCITY_I, i),
                (REG_MOTOR_VELOCITY_D, d),
            ],
        )?;
        Ok(())
    }

    /// Set the position control loop gains.
    pub fn set_position_pid(&mut self, p: f32, i: f32, d: f32) -> Result<()> {
        self.transport.write_index(
            self.device_id,
            &[
                (REG_MOTOR_POSITION_P, p),
                (REG_MOTOR_POSITION_I, i),
                (REG_MOTOR_POSITION_D, d),
            ],
        )?;
        Ok(())
    }

    /// Set the torque control loop gains.
    pub fn set_torque_pid(&mut self, p: f32, i: f32, d: f32) -> Result<()> {
        self.transport.write_index(
            self.device_id,
            &[
                (REG_MOTOR_TORQUE_P, p),
                (REG_MOTOR_TORQUE_I, i),
                (REG_MOTOR_TORQUE_D, d),
            ],
        )?;
        Ok(())
    }

    /// Enable or disable motor torque.
    pub fn enable_torque(&mut self, enabled: bool) -> Result<()> {
        self.write_one(REG_MOTOR_TORQUE_ENABLE, if enabled { 1.0 } else { 0.0 })
    }

    /// Set the PWM duty cycle, -100..=100 percent.
    pub fn set_duty_cycle(&mut self, duty: f32) -> Result<()> {
        self.write_one(REG_MOTOR_DUTY_CYCLE, duty)
    }

    fn write_one(&mut self, index: CapabilityIndex, value: f32) -> Result<()> {
        self.transport.write_index(self.device_id, &[(index, value)])?;
        Ok(())
    }

    // --- lifecycle --------------------------------------------------------

    /// Release the transport.
    ///
    /// Idempotent: the first call releases, every later call is a no-op.
    /// A release failure is logged and swallowed, so this is safe from
    /// any cleanup path.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.transport.close() {
            debug!("Transport close failed ({}); ignoring", e);
        }
    }

    /// Whether [`close`](Gateway::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T: Transport> Drop for Gateway<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Coerce a raw register value to a scalar, rejecting sequences.
fn scalar_of(raw: RawValue) -> Result<f64> {
    match raw {
        RawValue::Integer(v) => Ok(v as f64),
        RawValue::Float(v) => Ok(v),
        RawValue::Sequence(_) => Err(GatewayError::decode(
            "expected a scalar, register returned a sequence",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_core::{CapabilityIndex, constants::DEFAULT_MODULES};
    use modlink_transport::MockTransport;

    fn config() -> GatewayConfig {
        // Override keeps construction off the scan path; unit tests here
        // care about the pass-throughs, not discovery.
        GatewayConfig::new("/dev/null").with_modules_override(DEFAULT_MODULES.to_vec())
    }

    fn module(id: u8) -> ModuleId {
        ModuleId::new(id).unwrap()
    }

    #[test]
    fn test_rgb_targets_banked_registers() {
        let (transport, handle) = MockTransport::new();
        let mut gateway = Gateway::connect(transport, &config());

        gateway.set_rgb(module(5), 10, 20, 30).unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0].1,
            vec![
                (CapabilityIndex::new(0x0405), 10.0),
                (CapabilityIndex::new(0x0505), 20.0),
                (CapabilityIndex::new(0x0605), 30.0),
            ]
        );
    }

    #[test]
    fn test_buzzer_tone() {
        let (transport, handle) = MockTransport::new();
        let mut gateway = Gateway::connect(transport, &config());

        gateway.set_buzzer_tone(module(5), 600).unwrap();
        gateway.set_buzzer_tone(module(5), 0).unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].1, vec![(CapabilityIndex::new(0x0305), 600.0)]);
        assert_eq!(writes[1].1, vec![(CapabilityIndex::new(0x0305), 0.0)]);
    }

    #[test]
    fn test_distance_read() {
        let (transport, handle) = MockTransport::new();
        handle.set_register(CapabilityIndex::new(0x0701), RawValue::Float(42.5));
        let mut gateway = Gateway::connect(transport, &config());

        assert_eq!(gateway.get_distance_cm(module(1)).unwrap(), 42.5);
    }

    #[test]
    fn test_distance_rejects_sequence() {
        let (transport, handle) = MockTransport::new();
        handle.set_register(
            CapabilityIndex::new(0x0701),
            RawValue::Sequence(vec![1.0, 2.0]),
        );
        let mut gateway = Gateway::connect(transport, &config());

        assert!(matches!(
            gateway.get_distance_cm(module(1)),
            Err(GatewayError::Decode { .. })
        ));
    }

    #[test]
    fn test_button_truthiness() {
        let (transport, handle) = MockTransport::new();
        handle.set_register(CapabilityIndex::new(0x0105), RawValue::Integer(1));
        let mut gateway = Gateway::connect(transport, &config());

        assert!(gateway.get_button(module(5)).unwrap());

        handle.set_register(CapabilityIndex::new(0x0105), RawValue::Integer(0));
        assert!(!gateway.get_button(module(5)).unwrap());
    }

    #[test]
    fn test_motor_setters_target_control_registers() {
        let (transport, handle) = MockTransport::new();
        let mut gateway = Gateway::connect(transport, &config());

        gateway.set_shaft_cpr(6400).unwrap();
        gateway.set_operation_mode(OperationMode::Velocity).unwrap();
        gateway.enable_torque(true).unwrap();
        gateway.set_velocity_pid(1.0, 0.1, 0.01).unwrap();
        gateway.set_duty_cycle(-50.0).unwrap();

        let writes = handle.writes();
        assert_eq!(writes[0].1, vec![(REG_MOTOR_SHAFT_CPR, 6400.0)]);
        assert_eq!(writes[1].1, vec![(REG_MOTOR_OPERATION_MODE, 2.0)]);
        assert_eq!(writes[2].1, vec![(REG_MOTOR_TORQUE_ENABLE, 1.0)]);
        assert_eq!(
            writes[3].1,
            vec![
                (REG_MOTOR_VELOCITY_P, 1.0),
                (REG_MOTOR_VELOCITY_I, 0.1),
                (REG_MOTOR_VELOCITY_D, 0.01),
            ]
        );
        assert_eq!(writes[4].1, vec![(REG_MOTOR_DUTY_CYCLE, -50.0)]);
    }

    #[test]
    fn test_module_id_not_validated_against_inventory() {
        // Slot 42 carries nothing; construction of the call is fine and
        // the failure arrives from the wire.
        let (transport, _handle) = MockTransport::new();
        let mut gateway = Gateway::connect(transport, &config());

        assert!(gateway.get_button(module(42)).is_err());
    }
}
