//! The transport collaborator interface.
//!
//! The gateway core depends only on this trait, never on a concrete
//! implementation, so everything above the wire can be exercised against
//! [`MockTransport`](crate::mock::MockTransport).

use crate::error::Result;
use modlink_core::{CapabilityIndex, CatalogEntry, DeviceId, ModuleDescriptor, RawValue};

/// Synchronous access to one controller over one link.
///
/// Every method issues at most one request and blocks until the reply (or
/// a transport-level timeout) returns. Implementations are exclusively
/// owned by a single gateway instance; the trait deliberately does not
/// require `Send`, matching the single-caller-thread model.
///
/// # Errors
///
/// All methods report link-level failures through
/// [`TransportError`](crate::TransportError). None of them retry.
pub trait Transport {
    /// Select the wire protocol for a controller address.
    ///
    /// Host-side bookkeeping; subsequent catalog queries are directed at
    /// this device.
    fn attach_protocol(&mut self, device: DeviceId) -> Result<()>;

    /// Fetch the firmware's full index catalog: every register the
    /// attached controller exposes, by symbolic name.
    fn list_capability_indices(&mut self) -> Result<Vec<CatalogEntry>>;

    /// Read one register.
    fn read_index(&mut self, device: DeviceId, index: CapabilityIndex) -> Result<RawValue>;

    /// Write a batch of (register, value) pairs as a single command.
    fn write_index(&mut self, device: DeviceId, pairs: &[(CapabilityIndex, f32)]) -> Result<()>;

    /// Query the controller's live module inventory. The scan engine must
    /// have been enabled beforehand via the scan-mode register.
    fn scan_modules(&mut self, device: DeviceId) -> Result<Vec<ModuleDescriptor>>;

    /// Register the connected module list with the firmware, binding its
    /// view of attached modules to the host's.
    fn set_connected_modules(
        &mut self,
        device: DeviceId,
        modules: &[ModuleDescriptor],
    ) -> Result<()>;

    /// Release the underlying link. Implementations must tolerate a
    /// second call after a successful close.
    fn close(&mut self) -> Result<()>;
}
