//! Capability index resolution.
//!
//! Maps a human-readable capability key to a firmware register index by
//! scanning the catalog for the first name containing the key,
//! case-insensitively. A pure, synchronous lookup: no hardware I/O, no
//! retries.
//!
//! The substring match is deliberately kept as the firmware SDKs have
//! always done it, ambiguities included: with both `Joy` and `JoyButton`
//! in the catalog, the key `"joy"` binds whichever comes first in catalog
//! order. Changing the tie-break would silently rebind capabilities on
//! existing firmware, so it stays put (see DESIGN.md).

use modlink_core::{CapabilityIndex, CatalogEntry};

/// Find the first catalog entry whose name contains `key`,
/// case-insensitively.
#[must_use]
pub fn resolve(catalog: &[CatalogEntry], key: &str) -> Option<CapabilityIndex> {
    let key = key.to_lowercase();
    catalog
        .iter()
        .find(|entry| entry.name.to_lowercase().contains(&key))
        .map(|entry| entry.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn catalog(entries: &[(&str, u16)]) -> Vec<CatalogEntry> {
        entries
            .iter()
            .map(|(name, index)| CatalogEntry::new(*name, CapabilityIndex::new(*index)))
            .collect()
    }

    #[rstest]
    #[case("pot", Some(40))]
    #[case("POT", Some(40))]
    #[case("qtr", Some(50))]
    #[case("position", Some(51))]
    #[case("servo", None)]
    fn test_resolve(#[case] key: &str, #[case] expected: Option<u16>) {
        let catalog = catalog(&[("Pot_5", 40), ("QTR_1", 50), ("QTRPosition", 51)]);
        assert_eq!(
            resolve(&catalog, key),
            expected.map(CapabilityIndex::new)
        );
    }

    #[test]
    fn test_resolve_is_case_insensitive_both_ways() {
        let catalog = catalog(&[("qtrposition", 9)]);
        assert_eq!(resolve(&catalog, "Position"), Some(CapabilityIndex::new(9)));
    }

    #[test]
    fn test_first_match_in_catalog_order_wins() {
        // Both names contain "joy"; the ambiguity is inherited behavior
        // and pinned here: the earlier entry wins, whichever it is.
        let forward = catalog(&[("JoyButton", 7), ("Joy", 3)]);
        assert_eq!(resolve(&forward, "joy"), Some(CapabilityIndex::new(7)));

        let reversed = catalog(&[("Joy", 3), ("JoyButton", 7)]);
        assert_eq!(resolve(&reversed, "joy"), Some(CapabilityIndex::new(3)));
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(resolve(&[], "pot"), None);
    }

    #[test]
    fn test_empty_key_matches_first_entry() {
        // Degenerate but deterministic: every name contains "".
        let catalog = catalog(&[("Button_5", 1), ("Pot_5", 2)]);
        assert_eq!(resolve(&catalog, ""), Some(CapabilityIndex::new(1)));
    }
}
