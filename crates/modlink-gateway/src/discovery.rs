//! Module discovery.
//!
//! Determines which add-on modules are attached, as an explicit two-step
//! pipeline: *attempt* (caller override, or scan-mode write + bounded
//! settle + inventory query) then *classify* (usable inventory, or the
//! fixed default set). Discovery never raises: a controller with a dead
//! scan subsystem still yields an operable gateway wired for the default
//! module layout.

use modlink_core::{
    DeviceId, ModuleDescriptor,
    constants::{DEFAULT_MODULES, REG_SET_SCAN_MODULE_MODE},
};
use modlink_transport::{Result as TransportResult, Transport};
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// How the registered module list was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleSource {
    /// Caller-supplied list; no hardware interaction.
    Override,

    /// Live inventory reported by the controller's scan engine.
    Scanned,

    /// Scan produced nothing usable; the fixed default set was
    /// substituted.
    DefaultFallback,
}

/// Outcome of the discovery pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryReport {
    /// Ordered module list to register with the firmware.
    pub modules: Vec<ModuleDescriptor>,

    /// Where the list came from.
    pub source: ModuleSource,
}

/// Run discovery for one controller.
///
/// With `overrides` present the hardware is never touched and the list is
/// returned verbatim. Otherwise one scan is attempted with the given
/// settle time; an empty inventory and a transport error classify the
/// same way, as degradation to [`DEFAULT_MODULES`].
pub fn discover<T: Transport>(
    transport: &mut T,
    device: DeviceId,
    scan_timeout: Duration,
    overrides: Option<&[ModuleDescriptor]>,
) -> DiscoveryReport {
    if let Some(modules) = overrides {
        info!("Using override module list: {}", render(modules));
        return DiscoveryReport {
            modules: modules.to_vec(),
            source: ModuleSource::Override,
        };
    }

    match attempt_scan(transport, device, scan_timeout) {
        Ok(modules) if !modules.is_empty() => {
            info!("Scan found modules: {}", render(&modules));
            DiscoveryReport {
                modules,
                source: ModuleSource::Scanned,
            }
        }
        Ok(_) => {
            warn!(
                "Scan returned no modules; falling back to the default set: {}",
                render(&DEFAULT_MODULES)
            );
            fallback()
        }
        Err(e) => {
            warn!(
                "Scan failed ({}); falling back to the default set: {}",
                e,
                render(&DEFAULT_MODULES)
            );
            fallback()
        }
    }
}

/// Enable the scan engine, give the firmware time to settle, then ask for
/// the inventory. One attempt, no retry; the settle sleep is not
/// cancellable.
fn attempt_scan<T: Transport>(
    transport: &mut T,
    device: DeviceId,
    scan_timeout: Duration,
) -> TransportResult<Vec<ModuleDescriptor>> {
    transport.write_index(device, &[(REG_SET_SCAN_MODULE_MODE, 1.0)])?;
    thread::sleep(scan_timeout);
    transport.scan_modules(device)
}

fn fallback() -> DiscoveryReport {
    DiscoveryReport {
        modules: DEFAULT_MODULES.to_vec(),
        source: ModuleSource::DefaultFallback,
    }
}

fn render(modules: &[ModuleDescriptor]) -> String {
    modules
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
