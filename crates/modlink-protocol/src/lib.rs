//! Binary wire protocol between the host and the embedded controller.
//!
//! Every exchange on the serial link is one request frame followed by one
//! reply frame:
//!
//! ```text
//! [START][device_id][command][len][payload ...][crc][END]
//! ```
//!
//! [`Frame`] owns assembly and parsing (including checksum verification),
//! [`CommandCode`] names the six bus operations plus the generic
//! acknowledge pair, and [`codec`] encodes and decodes the per-command
//! payloads. Malformed input is always an [`modlink_core::Error`], never a
//! panic; the transport layer decides what to do with it.

pub mod codec;
pub mod commands;
pub mod frame;

pub use commands::CommandCode;
pub use frame::Frame;
