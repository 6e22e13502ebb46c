//! Cultivation realms - contiguous, non-overlapping level bands

use serde::{Deserialize, Serialize};

/// A coarse progression tier spanning a contiguous level range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub name: &'static str,
    pub min_level: u32,
    pub max_level: u32,
}

/// The fixed ordered realm table
pub const REALMS: &[Realm] = &[
    Realm {
        name: "Qi Condensation",
        min_level: 1,
        max_level: 9,
    },
    Realm {
        name: "Foundation Establishment",
        min_level: 10,
        max_level: 19,
    },
    Realm {
        name: "Core Formation",
        min_level: 20,
        max_level: 29,
    },
    Realm {
        name: "Nascent Soul",
        min_level: 30,
        max_level: 39,
    },
    Realm {
        name: "Spirit Severing",
        min_level: 40,
        max_level: 49,
    },
    Realm {
        name: "Dao Seeking",
        min_level: 50,
        max_level: u32::MAX,
    },
];

/// Realm index and entry for a level (levels below 1 are treated as 1)
pub fn realm_for_level(level: u32) -> (usize, &'static Realm) {
    let level = level.max(1);
    for (index, realm) in REALMS.iter().enumerate() {
        if level >= realm.min_level && level <= realm.max_level {
            return (index, realm);
        }
    }
    let last = REALMS.len() - 1;
    (last, &REALMS[last])
}

/// Realm index for a level
pub fn realm_index(level: u32) -> usize {
    realm_for_level(level).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_contiguous_and_ordered() {
        for pair in REALMS.windows(2) {
            assert_eq!(pair[0].max_level + 1, pair[1].min_level);
        }
    }

    #[test]
    fn lookup_hits_band_edges() {
        assert_eq!(realm_index(1), 0);
        assert_eq!(realm_index(9), 0);
        assert_eq!(realm_index(10), 1);
        assert_eq!(realm_index(50), 5);
        assert_eq!(realm_index(999), 5);
    }

    #[test]
    fn level_zero_counts_as_first_realm() {
        assert_eq!(realm_index(0), 0);
    }
}
