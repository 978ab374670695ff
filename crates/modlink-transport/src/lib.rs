//! Transport layer for the modlink stack.
//!
//! This crate owns the seam between the gateway core and the physical
//! link. The [`Transport`] trait is the complete collaborator interface
//! the gateway depends on: attach a protocol, introspect the index
//! catalog, read/write registers, scan and register modules, close. Two
//! implementations ship here:
//!
//! - [`SerialTransport`]: the real thing, one blocking request/reply
//!   exchange per call over a `serialport` handle.
//! - [`MockTransport`]: a scriptable in-memory double with a
//!   [`MockTransportHandle`] for seeding firmware state and inspecting
//!   the recorded call log; every test above the wire builds on it.
//!
//! The model is deliberately synchronous and single-threaded: one request
//! in flight, the reply blocks the caller, no internal locking. Callers
//! that want to poll several sensors concurrently must serialize those
//! calls themselves.

pub mod error;
pub mod mock;
pub mod ports;
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use mock::{MockTransport, MockTransportHandle, ScanBehavior};
pub use serial::SerialTransport;
pub use traits::Transport;
