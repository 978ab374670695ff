use crate::{
    Result,
    constants::{MAX_DEVICE_ID, MAX_MODULE_ID, MIN_MODULE_ID},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller address on the serial bus (0-254, 255 is broadcast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(u8);

impl DeviceId {
    /// Create a new device id with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDeviceId` if the id is outside 0-254.
    pub fn new(id: u8) -> Result<Self> {
        if id > MAX_DEVICE_ID {
            return Err(Error::InvalidDeviceId(id));
        }
        Ok(DeviceId(id))
    }

    /// Get the raw device id as u8.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        DeviceId(crate::constants::DEFAULT_DEVICE_ID)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u8 = s
            .parse()
            .map_err(|_| Error::InvalidDescriptor(format!("not a device id: {s}")))?;
        DeviceId::new(id)
    }
}

/// Module slot address on the bus (1-99).
///
/// Module ids are caller-supplied and deliberately not validated against
/// the registered module list; an operation on a slot that carries no
/// module fails at call time, on the wire, not at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u8);

impl ModuleId {
    /// Create a new module id with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidModuleId` if the id is outside 1-99.
    pub fn new(id: u8) -> Result<Self> {
        if !(MIN_MODULE_ID..=MAX_MODULE_ID).contains(&id) {
            return Err(Error::InvalidModuleId(id));
        }
        Ok(ModuleId(id))
    }

    /// Create a module id without validation (for internal use).
    pub(crate) const fn new_unchecked(id: u8) -> Self {
        ModuleId(id)
    }

    /// Get the raw slot address as u8.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModuleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u8 = s
            .parse()
            .map_err(|_| Error::InvalidDescriptor(format!("not a module id: {s}")))?;
        ModuleId::new(id)
    }
}

/// The nine supported add-on module types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ModuleKind {
    Button,
    LightSensor,
    Buzzer,
    Joystick,
    DistanceSensor,
    QtrArray,
    Potentiometer,
    RgbLed,
    Imu,
}

impl ModuleKind {
    /// The type name used on the wire and in module descriptors.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::LightSensor => "Light",
            Self::Buzzer => "Buzzer",
            Self::Joystick => "Joystick",
            Self::DistanceSensor => "Distance",
            Self::QtrArray => "QTR",
            Self::Potentiometer => "Pot",
            Self::RgbLed => "RGB",
            Self::Imu => "IMU",
        }
    }

    /// Parse a wire type name.
    pub fn from_wire_name(name: &str) -> Result<Self> {
        match name {
            "Button" => Ok(Self::Button),
            "Light" => Ok(Self::LightSensor),
            "Buzzer" => Ok(Self::Buzzer),
            "Joystick" => Ok(Self::Joystick),
            "Distance" => Ok(Self::DistanceSensor),
            "QTR" => Ok(Self::QtrArray),
            "Pot" => Ok(Self::Potentiometer),
            "RGB" => Ok(Self::RgbLed),
            "IMU" => Ok(Self::Imu),
            other => Err(Error::InvalidDescriptor(format!(
                "unknown module type: {other}"
            ))),
        }
    }
}

/// Logical name and slot of a physical add-on module, rendered `Kind_slot`
/// (e.g. `Button_5`).
///
/// Descriptors are used only for inventory and registration; all runtime
/// addressing goes through [`ModuleId`] plus a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub kind: ModuleKind,
    pub slot: ModuleId,
}

impl ModuleDescriptor {
    /// Create a new module descriptor.
    #[must_use]
    pub const fn new(kind: ModuleKind, slot: ModuleId) -> Self {
        Self { kind, slot }
    }
}

impl fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_{}", self.kind.wire_name(), self.slot)
    }
}

impl std::str::FromStr for ModuleDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, slot) = s
            .rsplit_once('_')
            .ok_or_else(|| Error::InvalidDescriptor(format!("missing slot suffix: {s}")))?;
        let kind = ModuleKind::from_wire_name(name)?;
        let slot: ModuleId = slot.parse()?;
        Ok(Self { kind, slot })
    }
}

/// Firmware-defined register index for a capability.
///
/// Opaque to the host: the only way to obtain one for an optional sensor
/// capability is the firmware's index catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityIndex(u16);

impl CapabilityIndex {
    /// Create a capability index from its raw register number.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the raw register number.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for CapabilityIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// One row of the firmware's introspectable index catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Symbolic register name as reported by the firmware.
    pub name: String,

    /// Register index behind that name.
    pub index: CapabilityIndex,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, index: CapabilityIndex) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// How a raw register value is decoded into a [`Reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessorKind {
    /// Numeric value passed through unchanged.
    Scalar,

    /// Ordered sequence; a bare scalar is wrapped as a one-element vector.
    Vector,

    /// Two-axis pair; a packed integer scalar splits into high/low bytes.
    AxisPair,

    /// Boolean truthiness of the raw value.
    Bitfield,
}

/// The logical capabilities the gateway knows how to bind.
///
/// Each carries the case-insensitive substring key used to locate its
/// register in the firmware catalog, and the accessor kind used to decode
/// reads. The set is closed: firmware may expose more registers, but only
/// these are surfaced through the typed API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    QtrRaw,
    QtrPosition,
    Potentiometer,
    JoystickAxes,
    JoystickButton,
    Accelerometer,
    Gyroscope,
}

impl Capability {
    /// All known capabilities, in binding order.
    pub const ALL: [Capability; 7] = [
        Self::QtrRaw,
        Self::QtrPosition,
        Self::Potentiometer,
        Self::JoystickAxes,
        Self::JoystickButton,
        Self::Accelerometer,
        Self::Gyroscope,
    ];

    /// Substring key matched (case-insensitively) against catalog names.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::QtrRaw => "qtr",
            Self::QtrPosition => "position",
            Self::Potentiometer => "pot",
            Self::JoystickAxes => "joy",
            Self::JoystickButton => "button",
            Self::Accelerometer => "accel",
            Self::Gyroscope => "gyro",
        }
    }

    /// How reads of this capability are decoded.
    #[must_use]
    pub const fn kind(&self) -> AccessorKind {
        match self {
            Self::QtrRaw => AccessorKind::Vector,
            Self::QtrPosition => AccessorKind::Scalar,
            Self::Potentiometer => AccessorKind::Scalar,
            Self::JoystickAxes => AccessorKind::AxisPair,
            Self::JoystickButton => AccessorKind::Bitfield,
            Self::Accelerometer => AccessorKind::Vector,
            Self::Gyroscope => AccessorKind::Vector,
        }
    }

    /// Human-readable capability name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::QtrRaw => "qtr-raw",
            Self::QtrPosition => "qtr-position",
            Self::Potentiometer => "potentiometer",
            Self::JoystickAxes => "joystick-axes",
            Self::JoystickButton => "joystick-button",
            Self::Accelerometer => "accelerometer",
            Self::Gyroscope => "gyroscope",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or_else(|| Error::UnknownCapability(s.to_string()))
    }
}

/// Raw value returned by a register read, before decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Sequence(Vec<f64>),
}

impl RawValue {
    /// Boolean truthiness of the raw value.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            Self::Sequence(v) => !v.is_empty(),
        }
    }
}

/// Decoded result of a capability read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reading {
    Scalar(f64),
    Vector(Vec<f64>),
    Flag(bool),
}

impl Reading {
    /// Get the scalar value, if this reading is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the vector components, if this reading is one.
    #[must_use]
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Get the flag state, if this reading is one.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpret a vector reading as an (x, y) axis pair.
    #[must_use]
    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            Self::Vector(v) if v.len() >= 2 => Some((v[0], v[1])),
            _ => None,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Vector(v) => {
                write!(f, "[")?;
                for (i, component) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{component}")?;
                }
                write!(f, "]")
            }
            Self::Flag(v) => write!(f, "{v}"),
        }
    }
}

/// Motor control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationMode {
    Pwm,
    Position,
    Velocity,
    Torque,
}

impl OperationMode {
    /// Firmware register value for this mode.
    #[must_use]
    pub const fn register_value(&self) -> u8 {
        match self {
            Self::Pwm => 0,
            Self::Position => 1,
            Self::Velocity => 2,
            Self::Torque => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(254)]
    fn test_device_id_valid(#[case] id: u8) {
        assert_eq!(DeviceId::new(id).unwrap().as_u8(), id);
    }

    #[test]
    fn test_device_id_broadcast_rejected() {
        assert!(DeviceId::new(255).is_err());
    }

    #[rstest]
    #[case(0)]
    #[case(100)]
    #[case(255)]
    fn test_module_id_out_of_range(#[case] id: u8) {
        assert!(ModuleId::new(id).is_err());
    }

    #[test]
    fn test_module_id_range() {
        assert!(ModuleId::new(1).is_ok());
        assert!(ModuleId::new(99).is_ok());
    }

    #[test]
    fn test_descriptor_display() {
        let desc = ModuleDescriptor::new(ModuleKind::Button, ModuleId::new(5).unwrap());
        assert_eq!(desc.to_string(), "Button_5");
    }

    #[rstest]
    #[case("Button_5", ModuleKind::Button, 5)]
    #[case("QTR_1", ModuleKind::QtrArray, 1)]
    #[case("RGB_12", ModuleKind::RgbLed, 12)]
    fn test_descriptor_parse(#[case] s: &str, #[case] kind: ModuleKind, #[case] slot: u8) {
        let desc: ModuleDescriptor = s.parse().unwrap();
        assert_eq!(desc.kind, kind);
        assert_eq!(desc.slot.as_u8(), slot);
    }

    #[rstest]
    #[case("Button")]
    #[case("Servo_5")]
    #[case("Button_0")]
    #[case("Button_x")]
    fn test_descriptor_parse_invalid(#[case] s: &str) {
        assert!(s.parse::<ModuleDescriptor>().is_err());
    }

    #[test]
    fn test_descriptor_round_trip() {
        for kind in [
            ModuleKind::Button,
            ModuleKind::LightSensor,
            ModuleKind::Buzzer,
            ModuleKind::Joystick,
            ModuleKind::DistanceSensor,
            ModuleKind::QtrArray,
            ModuleKind::Potentiometer,
            ModuleKind::RgbLed,
            ModuleKind::Imu,
        ] {
            let desc = ModuleDescriptor::new(kind, ModuleId::new(7).unwrap());
            let parsed: ModuleDescriptor = desc.to_string().parse().unwrap();
            assert_eq!(parsed, desc);
        }
    }

    #[test]
    fn test_capability_binding_order() {
        // The binder iterates ALL in this order; it mirrors the order in
        // which the firmware catalog grew, so keys that are substrings of
        // later names ("button" vs "JoyButton") resolve predictably.
        assert_eq!(Capability::ALL[0], Capability::QtrRaw);
        assert_eq!(Capability::ALL[4], Capability::JoystickButton);
    }

    #[test]
    fn test_capability_name_parse() {
        for cap in Capability::ALL {
            assert_eq!(cap.name().parse::<Capability>().unwrap(), cap);
        }
        assert!("pot".parse::<Capability>().is_err());
    }

    #[test]
    fn test_raw_value_truthiness() {
        assert!(RawValue::Integer(1).is_truthy());
        assert!(!RawValue::Integer(0).is_truthy());
        assert!(!RawValue::Float(0.0).is_truthy());
        assert!(RawValue::Sequence(vec![0.0]).is_truthy());
        assert!(!RawValue::Sequence(vec![]).is_truthy());
    }

    #[test]
    fn test_reading_accessors() {
        assert_eq!(Reading::Scalar(1.5).as_scalar(), Some(1.5));
        assert_eq!(Reading::Scalar(1.5).as_flag(), None);
        assert_eq!(
            Reading::Vector(vec![3.0, 4.0]).as_pair(),
            Some((3.0, 4.0))
        );
        assert_eq!(Reading::Vector(vec![3.0]).as_pair(), None);
        assert_eq!(Reading::Flag(true).as_flag(), Some(true));
    }

    #[test]
    fn test_reading_display() {
        assert_eq!(Reading::Scalar(2.5).to_string(), "2.5");
        assert_eq!(Reading::Vector(vec![1.0, 2.0]).to_string(), "[1, 2]");
        assert_eq!(Reading::Flag(false).to_string(), "false");
    }

    #[test]
    fn test_operation_mode_register_values() {
        assert_eq!(OperationMode::Pwm.register_value(), 0);
        assert_eq!(OperationMode::Torque.register_value(), 3);
    }

    #[test]
    fn test_descriptor_serde_round_trip() {
        let desc = ModuleDescriptor::new(ModuleKind::Imu, ModuleId::new(5).unwrap());
        let json = serde_json::to_string(&desc).unwrap();
        let back: ModuleDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }
}
