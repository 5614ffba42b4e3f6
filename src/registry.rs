use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Communities pre-seeded when the table is first created.
pub const SEED_COMMUNITIES: [&str; 6] = ["aeon", "sproto", "spx", "mog", "milady", "hpos"];

/// Community → registered addresses, persisted as one JSON object under a
/// single KV key. Invariant: an address appears in at most one list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationTable(pub BTreeMap<String, Vec<String>>);

impl RegistrationTable {
    /// Fresh table with the six fixed communities, all empty.
    pub fn seeded() -> Self {
        Self(
            SEED_COMMUNITIES
                .iter()
                .map(|c| (c.to_string(), Vec::new()))
                .collect(),
        )
    }

    /// Linear scan over every community's list. Registration volume is
    /// small enough that no index is kept.
    pub fn is_registered(&self, address: &str) -> bool {
        self.0.values().any(|list| list.iter().any(|a| a == address))
    }

    /// Register `address` under `community`. Returns `false` if the
    /// address is already registered anywhere — registration is one-shot
    /// per address, globally, with no community change afterwards. A
    /// community outside the seeded six is created on the fly.
    pub fn register(&mut self, address: &str, community: &str) -> bool {
        if self.is_registered(address) {
            return false;
        }
        self.0
            .entry(community.to_string())
            .or_default()
            .push(address.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_table_has_six_empty_communities() {
        let table = RegistrationTable::seeded();
        assert_eq!(table.0.len(), 6);
        for c in SEED_COMMUNITIES {
            assert_eq!(table.0.get(c), Some(&Vec::new()), "community {c}");
        }
    }

    #[test]
    fn register_is_one_shot_globally() {
        let mut table = RegistrationTable::seeded();
        assert!(table.register("0xABC", "aeon"));
        // Same community and a different one both refuse.
        assert!(!table.register("0xABC", "aeon"));
        assert!(!table.register("0xABC", "mog"));
        assert_eq!(table.0["aeon"], vec!["0xABC".to_string()]);
        assert!(table.0["mog"].is_empty());
    }

    #[test]
    fn unknown_community_created_dynamically() {
        let mut table = RegistrationTable::seeded();
        assert!(table.register("0xDEF", "remilio"));
        assert_eq!(table.0["remilio"], vec!["0xDEF".to_string()]);
        assert_eq!(table.0.len(), 7);
    }

    #[test]
    fn roundtrips_through_json() {
        let mut table = RegistrationTable::seeded();
        table.register("0x1", "spx");
        let raw = serde_json::to_string(&table).unwrap();
        let back: RegistrationTable = serde_json::from_str(&raw).unwrap();
        assert!(back.is_registered("0x1"));
        assert_eq!(back.0.len(), 6);
    }
}
