//! Protocol and domain constants for the modlink stack.
//!
//! The wire protocol frames every request and reply between the host and
//! the embedded controller as:
//!
//! ```text
//! [START][device_id][command][len][payload ...][crc][END]
//! ```
//!
//! Registers fall in two groups: device-level control registers at fixed
//! indices (motor configuration, scan mode), and per-module banks where the
//! concrete index is `bank + slot`. Optional sensor capabilities are *not*
//! part of this fixed map; their indices are discovered at runtime from the
//! firmware's index catalog.

use crate::types::{CapabilityIndex, ModuleDescriptor, ModuleId, ModuleKind};

// ============================================================================
// Frame layout
// ============================================================================

/// Start-of-frame marker.
pub const FRAME_START: u8 = 0x55;

/// End-of-frame marker.
pub const FRAME_END: u8 = 0xAA;

/// Bytes before the payload: start marker, device id, command, and the
/// two-byte little-endian payload length.
pub const FRAME_HEADER_LENGTH: usize = 5;

/// Total framing bytes around the payload (header + crc + end marker).
pub const FRAME_OVERHEAD: usize = FRAME_HEADER_LENGTH + 2;

/// Maximum accepted payload length. The length field is u16; the cap is
/// ours, sized for the largest index catalog a controller ships while
/// bounding what a corrupted length byte can make the host allocate.
pub const MAX_PAYLOAD_LENGTH: usize = 1024;

// ============================================================================
// Defaults
// ============================================================================

/// Default serial baud rate for the controller link.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default controller address on the bus.
pub const DEFAULT_DEVICE_ID: u8 = 0;

/// Default settle time after enabling the firmware scan engine, in
/// milliseconds. A single attempt; discovery never retries.
pub const DEFAULT_SCAN_TIMEOUT_MS: u64 = 100;

/// Default serial read timeout for a single reply, in milliseconds.
pub const DEFAULT_SERIAL_TIMEOUT_MS: u64 = 500;

// ============================================================================
// Identifier ranges
// ============================================================================

/// Maximum valid controller address (255 is reserved for broadcast).
pub const MAX_DEVICE_ID: u8 = 254;

/// Minimum valid module slot address.
pub const MIN_MODULE_ID: u8 = 1;

/// Maximum valid module slot address.
pub const MAX_MODULE_ID: u8 = 99;

// ============================================================================
// Control registers (device-level, always present)
// ============================================================================

/// Writing 1 here switches the firmware into module-scan mode.
pub const REG_SET_SCAN_MODULE_MODE: CapabilityIndex = CapabilityIndex::new(0x0005);

/// Motor operation mode (see [`crate::types::OperationMode`]).
pub const REG_MOTOR_OPERATION_MODE: CapabilityIndex = CapabilityIndex::new(0x0010);

/// Motor torque enable flag.
pub const REG_MOTOR_TORQUE_ENABLE: CapabilityIndex = CapabilityIndex::new(0x0011);

/// Encoder counts per shaft revolution.
pub const REG_MOTOR_SHAFT_CPR: CapabilityIndex = CapabilityIndex::new(0x0012);

/// Velocity setpoint in RPM.
pub const REG_MOTOR_GOAL_VELOCITY: CapabilityIndex = CapabilityIndex::new(0x0013);

/// Position setpoint in encoder ticks.
pub const REG_MOTOR_GOAL_POSITION: CapabilityIndex = CapabilityIndex::new(0x0014);

/// PWM duty cycle, -100..=100 percent.
pub const REG_MOTOR_DUTY_CYCLE: CapabilityIndex = CapabilityIndex::new(0x0015);

/// Velocity control loop gains.
pub const REG_MOTOR_VELOCITY_P: CapabilityIndex = CapabilityIndex::new(0x0016);
pub const REG_MOTOR_VELOCITY_I: CapabilityIndex = CapabilityIndex::new(0x0017);
pub const REG_MOTOR_VELOCITY_D: CapabilityIndex = CapabilityIndex::new(0x0018);

/// Position control loop gains.
pub const REG_MOTOR_POSITION_P: CapabilityIndex = CapabilityIndex::new(0x0019);
pub const REG_MOTOR_POSITION_I: CapabilityIndex = CapabilityIndex::new(0x001A);
pub const REG_MOTOR_POSITION_D: CapabilityIndex = CapabilityIndex::new(0x001B);

/// Torque control loop gains.
pub const REG_MOTOR_TORQUE_P: CapabilityIndex = CapabilityIndex::new(0x001C);
pub const REG_MOTOR_TORQUE_I: CapabilityIndex = CapabilityIndex::new(0x001D);
pub const REG_MOTOR_TORQUE_D: CapabilityIndex = CapabilityIndex::new(0x001E);

// ============================================================================
// Module register banks (index = bank + slot)
// ============================================================================

/// Digital button state bank.
pub const BANK_BUTTON: u16 = 0x0100;

/// Ambient light level bank (lux).
pub const BANK_LIGHT: u16 = 0x0200;

/// Buzzer tone frequency bank (Hz, 0 = off).
pub const BANK_BUZZER: u16 = 0x0300;

/// RGB LED channel banks.
pub const BANK_RGB_RED: u16 = 0x0400;
pub const BANK_RGB_GREEN: u16 = 0x0500;
pub const BANK_RGB_BLUE: u16 = 0x0600;

/// Ultrasonic distance bank (centimeters).
pub const BANK_DISTANCE: u16 = 0x0700;

/// Resolve a module-banked register to its concrete index.
pub const fn module_register(bank: u16, module: ModuleId) -> CapabilityIndex {
    CapabilityIndex::new(bank + module.as_u8() as u16)
}

// ============================================================================
// Default module set
// ============================================================================

/// Fallback module inventory used when auto-scan yields nothing usable:
/// one of each supported module type at its factory slot.
pub const DEFAULT_MODULES: [ModuleDescriptor; 9] = [
    ModuleDescriptor::new(ModuleKind::Button, ModuleId::new_unchecked(5)),
    ModuleDescriptor::new(ModuleKind::LightSensor, ModuleId::new_unchecked(5)),
    ModuleDescriptor::new(ModuleKind::Buzzer, ModuleId::new_unchecked(5)),
    ModuleDescriptor::new(ModuleKind::Joystick, ModuleId::new_unchecked(5)),
    ModuleDescriptor::new(ModuleKind::DistanceSensor, ModuleId::new_unchecked(1)),
    ModuleDescriptor::new(ModuleKind::QtrArray, ModuleId::new_unchecked(1)),
    ModuleDescriptor::new(ModuleKind::Potentiometer, ModuleId::new_unchecked(5)),
    ModuleDescriptor::new(ModuleKind::RgbLed, ModuleId::new_unchecked(5)),
    ModuleDescriptor::new(ModuleKind::Imu, ModuleId::new_unchecked(5)),
];
