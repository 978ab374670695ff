//! Serial implementation of the [`Transport`] trait.

use crate::{
    error::{Result, TransportError},
    traits::Transport,
};
use modlink_core::{
    CapabilityIndex, CatalogEntry, DeviceId, ModuleDescriptor, RawValue,
    constants::{DEFAULT_SERIAL_TIMEOUT_MS, FRAME_HEADER_LENGTH, FRAME_START, MAX_PAYLOAD_LENGTH},
};
use modlink_protocol::{CommandCode, Frame, codec};
use serialport::{ClearBuffer, SerialPort};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Bytes of noise tolerated before a start marker when hunting for the
/// reply frame. Anything beyond this is treated as a garbled link.
const RESYNC_LIMIT: usize = 64;

/// Blocking request/reply transport over a serial port.
///
/// One frame out, one frame back, per call. The read timeout set at open
/// time bounds how long a reply may take; there are no retries at this
/// layer.
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    path: String,
    timeout: Duration,
    attached: DeviceId,
}

impl SerialTransport {
    /// Open a serial port at the given path and baud rate with the
    /// default reply timeout.
    ///
    /// # Errors
    /// Returns an error if the port cannot be opened.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        Self::open_with_timeout(
            path,
            baud_rate,
            Duration::from_millis(DEFAULT_SERIAL_TIMEOUT_MS),
        )
    }

    /// Open a serial port with an explicit reply timeout.
    pub fn open_with_timeout(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud_rate).timeout(timeout).open()?;
        debug!("Opened serial port {} at {} baud", path, baud_rate);
        Ok(Self {
            port: Some(port),
            path: path.to_string(),
            timeout,
            attached: DeviceId::default(),
        })
    }

    /// Path this transport was opened on.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }

    /// Send one frame and block for the controller's reply.
    fn transact(&mut self, request: Frame) -> Result<Frame> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let port = self.port_mut()?;

        trace!("-> {}", request);
        port.write_all(&request.encode()).map_err(map_io)?;
        port.flush().map_err(map_io)?;

        let reply = read_reply(port, timeout_ms)?;
        trace!("<- {}", reply);
        Ok(reply)
    }

    /// Check a reply that carries no data.
    fn expect_ack(reply: Frame) -> Result<()> {
        match reply.command() {
            CommandCode::Ack => Ok(()),
            CommandCode::Nack => Err(TransportError::Rejected),
            other => Err(TransportError::unexpected_reply(format!(
                "{other} to a write"
            ))),
        }
    }

    /// Check a reply that must echo the request command.
    fn expect_command(reply: &Frame, expected: CommandCode) -> Result<()> {
        match reply.command() {
            c if c == expected => Ok(()),
            CommandCode::Nack => Err(TransportError::Rejected),
            other => Err(TransportError::unexpected_reply(format!(
                "{other} to a {expected} request"
            ))),
        }
    }
}

impl Transport for SerialTransport {
    fn attach_protocol(&mut self, device: DeviceId) -> Result<()> {
        // Local bookkeeping plus a buffer flush so the first real exchange
        // does not trip over boot noise from the controller.
        self.attached = device;
        if let Some(port) = self.port.as_mut() {
            port.clear(ClearBuffer::All)?;
        }
        Ok(())
    }

    fn list_capability_indices(&mut self) -> Result<Vec<CatalogEntry>> {
        let request = Frame::empty(self.attached, CommandCode::ListIndices);
        let reply = self.transact(request)?;
        Self::expect_command(&reply, CommandCode::ListIndices)?;
        Ok(codec::decode_index_list(reply.payload())?)
    }

    fn read_index(&mut self, device: DeviceId, index: CapabilityIndex) -> Result<RawValue> {
        let request =
            Frame::new(device, CommandCode::ReadIndex, codec::encode_read_request(index))?;
        let reply = self.transact(request)?;
        Self::expect_command(&reply, CommandCode::ReadIndex)?;
        Ok(codec::decode_raw_value(reply.payload())?)
    }

    fn write_index(&mut self, device: DeviceId, pairs: &[(CapabilityIndex, f32)]) -> Result<()> {
        let request =
            Frame::new(device, CommandCode::WriteIndex, codec::encode_write_batch(pairs))?;
        let reply = self.transact(request)?;
        Self::expect_ack(reply)
    }

    fn scan_modules(&mut self, device: DeviceId) -> Result<Vec<ModuleDescriptor>> {
        let request = Frame::empty(device, CommandCode::ScanModules);
        let reply = self.transact(request)?;
        Self::expect_command(&reply, CommandCode::ScanModules)?;
        Ok(codec::decode_module_list(reply.payload())?)
    }

    fn set_connected_modules(
        &mut self,
        device: DeviceId,
        modules: &[ModuleDescriptor],
    ) -> Result<()> {
        let request = Frame::new(
            device,
            CommandCode::SetModules,
            codec::encode_module_list(modules),
        )?;
        let reply = self.transact(request)?;
        Self::expect_ack(reply)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(port) = self.port.take() {
            debug!("Closing serial port {}", self.path);
            drop(port);
        }
        Ok(())
    }
}

/// Map serial I/O errors, folding read timeouts into the transport's
/// timeout variant.
fn map_io(error: std::io::Error) -> TransportError {
    if error.kind() == std::io::ErrorKind::TimedOut {
        TransportError::timeout(DEFAULT_SERIAL_TIMEOUT_MS)
    } else {
        TransportError::Io(error)
    }
}

/// Read one complete reply frame, resynchronizing on the start marker.
fn read_reply(port: &mut Box<dyn SerialPort>, timeout_ms: u64) -> Result<Frame> {
    let mut byte = [0u8; 1];

    // Hunt for the start marker, tolerating a bounded run of noise.
    let mut skipped = 0usize;
    loop {
        read_exact(port, &mut byte, timeout_ms)?;
        if byte[0] == FRAME_START {
            break;
        }
        skipped += 1;
        if skipped > RESYNC_LIMIT {
            return Err(TransportError::unexpected_reply(format!(
                "no frame start within {RESYNC_LIMIT} bytes"
            )));
        }
    }

    let mut header = [0u8; FRAME_HEADER_LENGTH - 1];
    read_exact(port, &mut header, timeout_ms)?;
    let declared = u16::from_le_bytes([header[2], header[3]]) as usize;
    if declared > MAX_PAYLOAD_LENGTH {
        return Err(TransportError::unexpected_reply(format!(
            "declared payload of {declared} bytes"
        )));
    }

    // Payload plus checksum and end marker.
    let mut rest = vec![0u8; declared + 2];
    read_exact(port, &mut rest, timeout_ms)?;

    let mut wire = Vec::with_capacity(Frame::wire_length(declared));
    wire.push(FRAME_START);
    wire.extend_from_slice(&header);
    wire.extend_from_slice(&rest);
    Ok(Frame::decode(&wire)?)
}

fn read_exact(port: &mut Box<dyn SerialPort>, buf: &mut [u8], timeout_ms: u64) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match port.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(TransportError::unexpected_reply(
                    "link closed mid-frame".to_string(),
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                return Err(TransportError::timeout(timeout_ms));
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(TransportError::Io(e)),
        }
    }
    Ok(())
}
