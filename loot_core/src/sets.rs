//! Item sets - named groups of gear granting escalating bonuses

use crate::item::Item;
use crate::types::{ItemKind, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One stat bonus granted by an active set tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetBonus {
    pub stat: StatKind,
    pub value: f64,
    pub percent: bool,
}

/// A piece-count threshold and the bonuses it unlocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTier {
    /// Equipped pieces required for this tier
    pub pieces: u32,
    pub bonuses: Vec<SetBonus>,
}

/// Catalog entry mapping a set id to its pieces and bonus tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSet {
    pub id: String,
    pub name: String,
    /// Designated display name per slot; also defines which kinds the set covers
    pub pieces: HashMap<ItemKind, String>,
    /// Tiers in ascending piece-count order
    pub tiers: Vec<SetTier>,
}

impl ItemSet {
    /// Designated name for a slot, if the set has a piece of that kind
    pub fn piece_name(&self, kind: ItemKind) -> Option<&str> {
        self.pieces.get(&kind).map(|s| s.as_str())
    }

    /// Tiers active at the given equipped-piece count (multiple can be active)
    pub fn active_tiers(&self, equipped_pieces: u32) -> impl Iterator<Item = &SetTier> {
        self.tiers
            .iter()
            .filter(move |tier| equipped_pieces >= tier.pieces)
    }
}

/// Registry of all item sets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetCatalog {
    sets: HashMap<String, ItemSet>,
}

impl SetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in sets
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register(azure_dragon());
        catalog.register(crimson_phoenix());
        catalog
    }

    pub fn register(&mut self, set: ItemSet) {
        self.sets.insert(set.id.clone(), set);
    }

    pub fn get(&self, id: &str) -> Option<&ItemSet> {
        self.sets.get(id)
    }

    /// Sets that have a piece for the given slot, in stable id order
    pub fn sets_for_kind(&self, kind: ItemKind) -> Vec<&ItemSet> {
        let mut sets: Vec<&ItemSet> = self
            .sets
            .values()
            .filter(|set| set.pieces.contains_key(&kind))
            .collect();
        sets.sort_by(|a, b| a.id.cmp(&b.id));
        sets
    }

    /// Recompute active set bonuses from the currently equipped items.
    ///
    /// A tier is active iff the equipped-piece count for its set reaches the
    /// tier threshold; every reached tier contributes, so bonuses escalate.
    pub fn active_bonuses(&self, equipped: &[&Item]) -> Vec<SetBonus> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for item in equipped {
            if let Some(ref set_id) = item.set_id {
                *counts.entry(set_id.as_str()).or_insert(0) += 1;
            }
        }

        let mut ids: Vec<&str> = counts.keys().copied().collect();
        ids.sort_unstable();

        let mut bonuses = Vec::new();
        for set_id in ids {
            let Some(set) = self.get(set_id) else {
                continue;
            };
            for tier in set.active_tiers(counts[set_id]) {
                bonuses.extend(tier.bonuses.iter().copied());
            }
        }
        bonuses
    }
}

fn azure_dragon() -> ItemSet {
    ItemSet {
        id: "azure_dragon".to_string(),
        name: "Azure Dragon Regalia".to_string(),
        pieces: HashMap::from([
            (ItemKind::Weapon, "Azure Dragon Fang".to_string()),
            (ItemKind::Armor, "Azure Dragon Scale".to_string()),
            (ItemKind::Ring, "Azure Dragon Eye".to_string()),
            (ItemKind::Amulet, "Azure Dragon Pearl".to_string()),
        ]),
        tiers: vec![
            SetTier {
                pieces: 2,
                bonuses: vec![
                    SetBonus {
                        stat: StatKind::Defense,
                        value: 15.0,
                        percent: false,
                    },
                    SetBonus {
                        stat: StatKind::MaxHp,
                        value: 50.0,
                        percent: false,
                    },
                ],
            },
            SetTier {
                pieces: 4,
                bonuses: vec![
                    SetBonus {
                        stat: StatKind::PhysicalAttack,
                        value: 10.0,
                        percent: true,
                    },
                    SetBonus {
                        stat: StatKind::Speed,
                        value: 5.0,
                        percent: false,
                    },
                ],
            },
        ],
    }
}

fn crimson_phoenix() -> ItemSet {
    ItemSet {
        id: "crimson_phoenix".to_string(),
        name: "Crimson Phoenix Vestments".to_string(),
        pieces: HashMap::from([
            (ItemKind::Weapon, "Crimson Phoenix Plume".to_string()),
            (ItemKind::Ring, "Crimson Phoenix Talon".to_string()),
            (ItemKind::Amulet, "Crimson Phoenix Heart".to_string()),
        ]),
        tiers: vec![
            SetTier {
                pieces: 2,
                bonuses: vec![
                    SetBonus {
                        stat: StatKind::MagicalAttack,
                        value: 12.0,
                        percent: false,
                    },
                    SetBonus {
                        stat: StatKind::MaxMp,
                        value: 40.0,
                        percent: false,
                    },
                ],
            },
            SetTier {
                pieces: 3,
                bonuses: vec![
                    SetBonus {
                        stat: StatKind::ElementalDamage,
                        value: 10.0,
                        percent: true,
                    },
                    SetBonus {
                        stat: StatKind::CritRate,
                        value: 5.0,
                        percent: false,
                    },
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rarity;

    fn set_piece(id: u64, kind: ItemKind, set_id: &str) -> Item {
        let mut item = Item::new(id, kind, Rarity::Rare, 10);
        item.set_id = Some(set_id.to_string());
        item
    }

    #[test]
    fn no_bonus_below_threshold() {
        let catalog = SetCatalog::with_defaults();
        let weapon = set_piece(1, ItemKind::Weapon, "azure_dragon");
        assert!(catalog.active_bonuses(&[&weapon]).is_empty());
    }

    #[test]
    fn two_pieces_activate_first_tier() {
        let catalog = SetCatalog::with_defaults();
        let weapon = set_piece(1, ItemKind::Weapon, "azure_dragon");
        let armor = set_piece(2, ItemKind::Armor, "azure_dragon");
        let bonuses = catalog.active_bonuses(&[&weapon, &armor]);
        assert_eq!(bonuses.len(), 2);
        assert!(bonuses.iter().any(|b| b.stat == StatKind::Defense));
    }

    #[test]
    fn full_set_activates_all_tiers() {
        let catalog = SetCatalog::with_defaults();
        let items = [
            set_piece(1, ItemKind::Weapon, "azure_dragon"),
            set_piece(2, ItemKind::Armor, "azure_dragon"),
            set_piece(3, ItemKind::Ring, "azure_dragon"),
            set_piece(4, ItemKind::Amulet, "azure_dragon"),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let bonuses = catalog.active_bonuses(&refs);
        // Both the 2-piece and 4-piece tier contribute
        assert_eq!(bonuses.len(), 4);
    }

    #[test]
    fn unknown_set_ids_are_ignored() {
        let catalog = SetCatalog::with_defaults();
        let a = set_piece(1, ItemKind::Weapon, "lost_relics");
        let b = set_piece(2, ItemKind::Armor, "lost_relics");
        assert!(catalog.active_bonuses(&[&a, &b]).is_empty());
    }
}
