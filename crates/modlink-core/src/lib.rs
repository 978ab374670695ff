//! Shared types, constants, and error taxonomy for the modlink stack.
//!
//! Every other modlink crate builds on this one: the wire protocol encodes
//! and decodes these types, the transport moves them, the gateway binds
//! capabilities to register indices, and the device facades consume the
//! decoded readings.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
