use crate::types::{Affix, ItemKind, Rarity, SoulEffect, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A fully realized item with all stats computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identity
    pub id: u64,
    /// Display name (generic until flavor resolves, fixed for set pieces)
    pub name: String,
    /// Flavor description, empty until the content service fills it in
    #[serde(default)]
    pub description: String,
    pub kind: ItemKind,
    pub rarity: Rarity,
    /// Item level the stats were scaled from
    pub level: u32,
    /// Primary rolled stats
    #[serde(default)]
    pub base_stats: HashMap<StatKind, f64>,
    /// Secondary rolled stats
    #[serde(default)]
    pub bonus_stats: HashMap<StatKind, f64>,
    /// Set membership, if the item was replaced by a set-catalog entry
    #[serde(default)]
    pub set_id: Option<String>,
    #[serde(default)]
    pub affix: Option<Affix>,
    #[serde(default)]
    pub soul_effect: Option<SoulEffect>,
    /// Current upgrade level; capped by the rarity tier
    #[serde(default)]
    pub upgrade_level: u32,
    /// Consecutive failed upgrade attempts since the last success (pity)
    #[serde(default)]
    pub failed_upgrades: u32,
    #[serde(default)]
    pub evolved: bool,
    /// Skill or technique id granted on consumption (tomes and manuals)
    #[serde(default)]
    pub grants_id: Option<String>,
}

impl Item {
    /// Create a bare item with a generic display name
    pub fn new(id: u64, kind: ItemKind, rarity: Rarity, level: u32) -> Self {
        Item {
            id,
            name: format!("{} {}", rarity, kind),
            description: String::new(),
            kind,
            rarity,
            level,
            base_stats: HashMap::new(),
            bonus_stats: HashMap::new(),
            set_id: None,
            affix: None,
            soul_effect: None,
            upgrade_level: 0,
            failed_upgrades: 0,
            evolved: false,
            grants_id: None,
        }
    }

    /// Maximum upgrade level for this item
    pub fn upgrade_cap(&self) -> u32 {
        self.rarity.max_upgrade_level()
    }

    /// The highest-valued base stat, ties broken by key order.
    ///
    /// Used as the evolution boost target.
    pub fn primary_stat(&self) -> Option<StatKind> {
        self.base_stats
            .iter()
            .max_by(|(ka, va), (kb, vb)| {
                va.partial_cmp(vb)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(kb.cmp(ka))
            })
            .map(|(k, _)| *k)
    }

    /// Record a failed upgrade attempt
    pub(crate) fn record_failure(&mut self) {
        self.failed_upgrades += 1;
    }

    /// Clear the pity counter after a successful upgrade
    pub(crate) fn clear_failures(&mut self) {
        self.failed_upgrades = 0;
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "══ {} ══", self.name)?;
        write!(f, "{} ({})", self.kind, self.rarity)?;
        if self.upgrade_level > 0 {
            write!(f, " +{}", self.upgrade_level)?;
        }
        writeln!(f)?;

        if !self.base_stats.is_empty() {
            writeln!(f)?;
            writeln!(f, "Stats")?;
            let mut stats: Vec<_> = self.base_stats.iter().collect();
            stats.sort_by_key(|(k, _)| **k);
            for (stat, value) in stats {
                writeln!(f, "  {}: {}", stat, value)?;
            }
        }

        if !self.bonus_stats.is_empty() {
            writeln!(f)?;
            writeln!(f, "Bonuses")?;
            let mut stats: Vec<_> = self.bonus_stats.iter().collect();
            stats.sort_by_key(|(k, _)| **k);
            for (stat, value) in stats {
                writeln!(f, "  +{} {}", value, stat)?;
            }
        }

        if let Some(affix) = self.affix {
            writeln!(f)?;
            writeln!(f, "Affix: {}", affix)?;
        }
        if let Some(ref soul) = self.soul_effect {
            writeln!(f, "Soul Effect: {}", soul)?;
        }
        if let Some(ref set_id) = self.set_id {
            writeln!(f, "Set: {}", set_id)?;
        }
        if !self.description.is_empty() {
            writeln!(f)?;
            write!(f, "{}", self.description)?;
        }
        Ok(())
    }
}
