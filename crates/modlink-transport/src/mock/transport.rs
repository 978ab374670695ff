use crate::{
    error::{Result, TransportError},
    traits::Transport,
};
use modlink_core::{CapabilityIndex, CatalogEntry, DeviceId, ModuleDescriptor, RawValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// What the scripted firmware answers to a module scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScanBehavior {
    /// Reply with a module inventory.
    Inventory(Vec<ModuleDescriptor>),

    /// Reply with an empty inventory (the factory default here: a fresh
    /// mock behaves like a controller whose scan subsystem finds nothing).
    #[default]
    Empty,

    /// Fail the scan request outright.
    Fail,
}

#[derive(Debug, Default)]
struct MockState {
    // Scripted firmware state
    catalog: Vec<CatalogEntry>,
    catalog_fails: bool,
    scan: ScanBehavior,
    registers: HashMap<u16, RawValue>,
    write_fails: bool,
    register_fails: bool,

    // Recorded call log
    attached: Vec<DeviceId>,
    reads: Vec<(DeviceId, CapabilityIndex)>,
    writes: Vec<(DeviceId, Vec<(CapabilityIndex, f32)>)>,
    registered: Vec<(DeviceId, Vec<ModuleDescriptor>)>,
    catalog_calls: u32,
    scan_calls: u32,
    close_calls: u32,
}

/// In-memory transport double.
///
/// Created together with its handle; the transport side is moved into a
/// gateway while the handle keeps shared access to the scripted state and
/// the call log.
///
/// # Examples
///
/// ```
/// use modlink_transport::{MockTransport, Transport};
/// use modlink_core::{CapabilityIndex, CatalogEntry, DeviceId, RawValue};
///
/// let (mut transport, handle) = MockTransport::new();
/// handle.seed_catalog(vec![CatalogEntry::new("Pot_5", CapabilityIndex::new(40))]);
/// handle.set_register(CapabilityIndex::new(40), RawValue::Integer(512));
///
/// let device = DeviceId::new(0).unwrap();
/// let value = transport.read_index(device, CapabilityIndex::new(40)).unwrap();
/// assert_eq!(value, RawValue::Integer(512));
/// assert_eq!(handle.reads().len(), 1);
/// ```
#[derive(Debug)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
    closed: bool,
}

impl MockTransport {
    /// Create a new mock transport and its controlling handle.
    pub fn new() -> (Self, MockTransportHandle) {
        let state = Rc::new(RefCell::new(MockState::default()));
        (
            Self {
                state: Rc::clone(&state),
                closed: false,
            },
            MockTransportHandle { state },
        )
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new().0
    }
}

impl Transport for MockTransport {
    fn attach_protocol(&mut self, device: DeviceId) -> Result<()> {
        self.state.borrow_mut().attached.push(device);
        Ok(())
    }

    fn list_capability_indices(&mut self) -> Result<Vec<CatalogEntry>> {
        let mut state = self.state.borrow_mut();
        state.catalog_calls += 1;
        if state.catalog_fails {
            return Err(TransportError::unexpected_reply("catalog unavailable"));
        }
        Ok(state.catalog.clone())
    }

    fn read_index(&mut self, device: DeviceId, index: CapabilityIndex) -> Result<RawValue> {
        let mut state = self.state.borrow_mut();
        state.reads.push((device, index));
        if state.register_fails {
            return Err(TransportError::Rejected);
        }
        state
            .registers
            .get(&index.as_u16())
            .cloned()
            .ok_or(TransportError::Rejected)
    }

    fn write_index(&mut self, device: DeviceId, pairs: &[(CapabilityIndex, f32)]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.writes.push((device, pairs.to_vec()));
        if state.write_fails {
            return Err(TransportError::Rejected);
        }
        for (index, value) in pairs {
            state
                .registers
                .insert(index.as_u16(), RawValue::Float(f64::from(*value)));
        }
        Ok(())
    }

    fn scan_modules(&mut self, _device: DeviceId) -> Result<Vec<ModuleDescriptor>> {
        let mut state = self.state.borrow_mut();
        state.scan_calls += 1;
        match &state.scan {
            ScanBehavior::Inventory(modules) => Ok(modules.clone()),
            ScanBehavior::Empty => Ok(Vec::new()),
            ScanBehavior::Fail => Err(TransportError::unexpected_reply("scan subsystem down")),
        }
    }

    fn set_connected_modules(
        &mut self,
        device: DeviceId,
        modules: &[ModuleDescriptor],
    ) -> Result<()> {
        self.state
            .borrow_mut()
            .registered
            .push((device, modules.to_vec()));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state.borrow_mut().close_calls += 1;
        if self.closed {
            // Tolerated: spec requires double-close to be harmless, but
            // the call is still recorded so tests can see it happened.
            return Ok(());
        }
        self.closed = true;
        Ok(())
    }
}

/// Handle for scripting and inspecting a [`MockTransport`].
///
/// Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct MockTransportHandle {
    state: Rc<RefCell<MockState>>,
}

impl MockTransportHandle {
    // --- scripting -------------------------------------------------------

    /// Replace the firmware index catalog.
    pub fn seed_catalog(&self, entries: Vec<CatalogEntry>) {
        self.state.borrow_mut().catalog = entries;
    }

    /// Make catalog fetches fail.
    pub fn fail_catalog(&self) {
        self.state.borrow_mut().catalog_fails = true;
    }

    /// Script the scan reply.
    pub fn set_scan_behavior(&self, behavior: ScanBehavior) {
        self.state.borrow_mut().scan = behavior;
    }

    /// Set a register's value for subsequent reads.
    pub fn set_register(&self, index: CapabilityIndex, value: RawValue) {
        self.state
            .borrow_mut()
            .registers
            .insert(index.as_u16(), value);
    }

    /// Make every register read fail.
    pub fn fail_reads(&self) {
        self.state.borrow_mut().register_fails = true;
    }

    /// Make every register write fail.
    pub fn fail_writes(&self) {
        self.state.borrow_mut().write_fails = true;
    }

    // --- inspection ------------------------------------------------------

    /// Devices passed to `attach_protocol`, in order.
    pub fn attached(&self) -> Vec<DeviceId> {
        self.state.borrow().attached.clone()
    }

    /// Every register read, in order.
    pub fn reads(&self) -> Vec<(DeviceId, CapabilityIndex)> {
        self.state.borrow().reads.clone()
    }

    /// Every write batch, in order.
    pub fn writes(&self) -> Vec<(DeviceId, Vec<(CapabilityIndex, f32)>)> {
        self.state.borrow().writes.clone()
    }

    /// Every `set_connected_modules` payload, in order.
    pub fn registered(&self) -> Vec<(DeviceId, Vec<ModuleDescriptor>)> {
        self.state.borrow().registered.clone()
    }

    /// Number of catalog fetches issued.
    pub fn catalog_calls(&self) -> u32 {
        self.state.borrow().catalog_calls
    }

    /// Number of scan requests issued.
    pub fn scan_calls(&self) -> u32 {
        self.state.borrow().scan_calls
    }

    /// Number of close calls issued.
    pub fn close_calls(&self) -> u32 {
        self.state.borrow().close_calls
    }

    /// Current value of a register, if any write or seed has set it.
    pub fn register(&self, index: CapabilityIndex) -> Option<RawValue> {
        self.state.borrow().registers.get(&index.as_u16()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlink_core::{ModuleId, ModuleKind};

    fn device() -> DeviceId {
        DeviceId::new(0).unwrap()
    }

    #[test]
    fn test_read_missing_register_rejected() {
        let (mut transport, _handle) = MockTransport::new();
        let result = transport.read_index(device(), CapabilityIndex::new(9));
        assert!(matches!(result, Err(TransportError::Rejected)));
    }

    #[test]
    fn test_write_updates_register() {
        let (mut transport, handle) = MockTransport::new();
        transport
            .write_index(device(), &[(CapabilityIndex::new(2), 42.0)])
            .unwrap();
        assert_eq!(
            handle.register(CapabilityIndex::new(2)),
            Some(RawValue::Float(42.0))
        );
    }

    #[test]
    fn test_scan_behaviors() {
        let (mut transport, handle) = MockTransport::new();

        assert!(transport.scan_modules(device()).unwrap().is_empty());

        let inventory = vec![ModuleDescriptor::new(
            ModuleKind::Button,
            ModuleId::new(5).unwrap(),
        )];
        handle.set_scan_behavior(ScanBehavior::Inventory(inventory.clone()));
        assert_eq!(transport.scan_modules(device()).unwrap(), inventory);

        handle.set_scan_behavior(ScanBehavior::Fail);
        assert!(transport.scan_modules(device()).is_err());

        assert_eq!(handle.scan_calls(), 3);
    }

    #[test]
    fn test_call_log_order() {
        let (mut transport, handle) = MockTransport::new();
        transport
            .write_index(device(), &[(CapabilityIndex::new(1), 1.0)])
            .unwrap();
        transport
            .write_index(device(), &[(CapabilityIndex::new(1), 0.0)])
            .unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].1[0].1, 1.0);
        assert_eq!(writes[1].1[0].1, 0.0);
    }

    #[test]
    fn test_close_counted() {
        let (mut transport, handle) = MockTransport::new();
        transport.close().unwrap();
        transport.close().unwrap();
        assert_eq!(handle.close_calls(), 2);
    }
}
