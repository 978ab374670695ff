//! The gateway capability-binding layer.
//!
//! This crate reconciles two views of the same hardware: the firmware's
//! *dynamic* index catalog (registers discovered by name at runtime) and
//! the *static*, typed API the rest of the stack consumes. Construction
//! runs a fixed sequence (attach the protocol, fetch the catalog, bind
//! capabilities, discover modules, register them) and degrades at every
//! step instead of failing: a missing capability becomes an unavailable
//! binding, a failed scan becomes the default module set.
//!
//! # Layers
//!
//! - [`resolver`]: pure substring lookup from capability key to catalog
//!   index.
//! - [`binder`]: the binding table, capability to (index, accessor kind),
//!   built once, read-only afterwards, inspectable.
//! - [`discovery`]: the two-step module discovery pipeline (attempt,
//!   then classify), with the fixed default fallback.
//! - [`gateway`]: the facade everything else calls, with capability reads,
//!   fixed-register pass-throughs, and idempotent close.
//!
//! # Example
//!
//! ```
//! use modlink_core::{Capability, ModuleId};
//! use modlink_gateway::{Gateway, GatewayConfig};
//! use modlink_transport::MockTransport;
//!
//! let (transport, _handle) = MockTransport::new();
//! let config = GatewayConfig::new("/dev/ttyUSB0");
//! let mut gateway = Gateway::connect(transport, &config);
//!
//! // Nothing in the (empty) catalog, so the capability is unavailable:
//! // a state, not an error.
//! let module = ModuleId::new(5).unwrap();
//! let reading = gateway
//!     .read_capability(module, Capability::Potentiometer)
//!     .unwrap();
//! assert!(reading.is_none());
//! ```

pub mod binder;
pub mod config;
pub mod discovery;
pub mod error;
pub mod gateway;
pub mod resolver;

pub use binder::{Binding, BindingTable};
pub use config::GatewayConfig;
pub use discovery::{DiscoveryReport, ModuleSource};
pub use error::{GatewayError, Result};
pub use gateway::Gateway;
