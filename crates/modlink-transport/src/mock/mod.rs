//! Mock transport for testing and development.
//!
//! Simulates the controller firmware in memory: the
//! [`MockTransportHandle`] scripts the catalog, scan behavior, and
//! register values, and exposes the recorded call log for assertions.

mod transport;

pub use transport::{MockTransport, MockTransportHandle, ScanBehavior};
