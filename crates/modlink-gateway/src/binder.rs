//! The capability binding table.
//!
//! Built once at gateway construction from the firmware catalog, then
//! read-only: each of the known logical capabilities either resolves to a
//! register index with an accessor kind, or is recorded as unavailable.
//! Absence is a state, not an error: one missing capability never stops
//! the others from binding, and a caller can always ask the table what it
//! got before touching the hardware.

use crate::resolver;
use modlink_core::{AccessorKind, Capability, CapabilityIndex, CatalogEntry, RawValue, Reading};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One bound capability: where it lives and how to decode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Register index resolved from the catalog.
    pub index: CapabilityIndex,

    /// How raw reads of this register decode.
    pub kind: AccessorKind,
}

/// Capability-to-binding map with the unavailable set implied by absence.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: BTreeMap<Capability, Binding>,
}

impl BindingTable {
    /// Resolve every known capability against the catalog.
    ///
    /// Emits one diagnostic per miss and keeps going; the returned table
    /// is whatever subset resolved.
    pub fn build(catalog: &[CatalogEntry]) -> Self {
        let mut bindings = BTreeMap::new();
        for capability in Capability::ALL {
            match resolver::resolve(catalog, capability.key()) {
                Some(index) => {
                    debug!("Bound {} to register {}", capability, index);
                    bindings.insert(
                        capability,
                        Binding {
                            index,
                            kind: capability.kind(),
                        },
                    );
                }
                None => {
                    warn!(
                        "No catalog index matching '{}'; {} unavailable",
                        capability.key(),
                        capability
                    );
                }
            }
        }
        Self { bindings }
    }

    /// Look up a capability's binding.
    #[must_use]
    pub fn get(&self, capability: Capability) -> Option<&Binding> {
        self.bindings.get(&capability)
    }

    /// Whether a capability resolved at construction time.
    #[must_use]
    pub fn is_bound(&self, capability: Capability) -> bool {
        self.bindings.contains_key(&capability)
    }

    /// Capabilities that did not resolve, in declaration order.
    #[must_use]
    pub fn unavailable(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| !self.bindings.contains_key(c))
            .collect()
    }

    /// Iterate the bound capabilities.
    pub fn iter(&self) -> impl Iterator<Item = (Capability, &Binding)> {
        self.bindings.iter().map(|(c, b)| (*c, b))
    }

    /// Number of bound capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing resolved at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Decode a raw register value according to the accessor kind.
///
/// - Scalar: the numeric value unchanged (first component if the firmware
///   sent a sequence, zero if that sequence was empty).
/// - Vector: a sequence as-is; a bare scalar wrapped as one component.
/// - AxisPair: a sequence as-is; a *packed integer* scalar split into
///   high/low bytes, for firmware that packs both axes into one word. The
///   split only exists for axis pairs; floats cannot pack and fall back
///   to the single-component wrap.
/// - Bitfield: boolean truthiness of the raw value.
#[must_use]
pub fn decode(kind: AccessorKind, raw: RawValue) -> Reading {
    match kind {
        AccessorKind::Scalar => Reading::Scalar(match raw {
            RawValue::Integer(v) => v as f64,
            RawValue::Float(v) => v,
            RawValue::Sequence(s) => s.first().copied().unwrap_or(0.0),
        }),
        AccessorKind::Vector => Reading::Vector(match raw {
            RawValue::Sequence(s) => s,
            RawValue::Integer(v) => vec![v as f64],
            RawValue::Float(v) => vec![v],
        }),
        AccessorKind::AxisPair => Reading::Vector(match raw {
            RawValue::Sequence(s) => s,
            RawValue::Integer(v) => vec![(v >> 8) as f64, (v & 0xFF) as f64],
            RawValue::Float(v) => vec![v],
        }),
        AccessorKind::Bitfield => Reading::Flag(raw.is_truthy()),
    }
}
