//! Serial port discovery.
//!
//! Finds the USB serial adapter the controller sits behind without the
//! user having to know their platform's device naming. Pure heuristics
//! over `serialport::available_ports()`; no traffic is sent.

use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, warn};

/// Port name fragments that identify a USB serial adapter when the
/// enumerator cannot classify the port type itself.
#[cfg(target_os = "windows")]
const CANDIDATE_FRAGMENTS: &[&str] = &["COM"];
#[cfg(target_os = "macos")]
const CANDIDATE_FRAGMENTS: &[&str] = &[
    "tty.usbserial",
    "tty.usbmodem",
    "tty.SLAB_USBtoUART",
    "tty.wchusbserial",
    "cu.usbserial",
];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CANDIDATE_FRAGMENTS: &[&str] = &["ttyUSB", "ttyACM"];

/// Enumerate all serial ports on this machine.
pub fn available() -> Vec<SerialPortInfo> {
    match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            warn!("Serial port enumeration failed: {}", e);
            Vec::new()
        }
    }
}

/// Find the first port that looks like the controller's USB adapter.
///
/// USB-classified ports win; otherwise the platform name heuristics
/// decide. Returns `None` when nothing plausible is attached.
pub fn first_gateway_port() -> Option<String> {
    let ports = available();
    let found = ports
        .iter()
        .find(|p| is_candidate(p))
        .map(|p| p.port_name.clone());
    match &found {
        Some(name) => debug!("USB gateway candidate found on {}", name),
        None => debug!("No USB gateway candidate among {} ports", ports.len()),
    }
    found
}

fn is_candidate(port: &SerialPortInfo) -> bool {
    if matches!(port.port_type, SerialPortType::UsbPort(_)) {
        return true;
    }
    CANDIDATE_FRAGMENTS
        .iter()
        .any(|fragment| port.port_name.contains(fragment))
}
