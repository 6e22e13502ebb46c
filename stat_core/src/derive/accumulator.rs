//! StatAccumulator - collects bonuses from every source before projection

use crate::skill::{EffectKind, Skill};
use crate::technique::{Technique, TechniqueKind};
use crate::types::BaseStats;
use loot_core::{Item, SetBonus, StatKind};
use std::collections::HashMap;

/// Accumulates stat modifications from gear, passives, techniques and sets.
///
/// Core attributes are tracked as named totals; everything else lands in a
/// flat or percent map keyed by derived-stat name. Evasion, accuracy and
/// penetration keep two separate buckets because their gear-driven and
/// skill-driven contributions cap independently.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    // === Core attribute totals ===
    pub strength: f64,
    pub agility: f64,
    pub intellect: f64,
    pub spirit: f64,
    pub constitution: f64,
    pub dexterity: f64,

    // === Derived-stat bonuses ===
    pub flat: HashMap<StatKind, f64>,
    pub percent: HashMap<StatKind, f64>,

    // === Two-tier capped stats ===
    pub gear_evasion: f64,
    pub skill_evasion: f64,
    pub gear_accuracy: f64,
    pub skill_accuracy: f64,
    pub gear_penetration: f64,
    pub skill_penetration: f64,
}

impl StatAccumulator {
    pub fn new() -> Self {
        StatAccumulator::default()
    }

    /// Seed the core attribute totals from a computed base
    pub fn seed_core(&mut self, base: &BaseStats) {
        self.strength = base.strength as f64;
        self.agility = base.agility as f64;
        self.intellect = base.intellect as f64;
        self.spirit = base.spirit as f64;
        self.constitution = base.constitution as f64;
        self.dexterity = base.dexterity as f64;
    }

    /// Add a flat bonus, routed to the right bucket.
    ///
    /// Core-attribute keys merge into the attribute totals; the capped trio
    /// goes to the gear tier; everything else lands in the flat map.
    pub fn add_flat(&mut self, stat: StatKind, value: f64) {
        match stat {
            StatKind::Strength => self.strength += value,
            StatKind::Agility => self.agility += value,
            StatKind::Intellect => self.intellect += value,
            StatKind::Spirit => self.spirit += value,
            StatKind::Constitution => self.constitution += value,
            StatKind::Dexterity => self.dexterity += value,
            StatKind::Evasion => self.gear_evasion += value,
            StatKind::Accuracy => self.gear_accuracy += value,
            StatKind::Penetration => self.gear_penetration += value,
            other => *self.flat.entry(other).or_insert(0.0) += value,
        }
    }

    /// Add a skill/technique-driven bonus to one of the capped trio
    fn add_skill_tier(&mut self, stat: StatKind, value: f64) {
        match stat {
            StatKind::Evasion => self.skill_evasion += value,
            StatKind::Accuracy => self.skill_accuracy += value,
            StatKind::Penetration => self.skill_penetration += value,
            other => self.add_flat(other, value),
        }
    }

    /// Add a percent bonus keyed by derived-stat name
    pub fn add_percent(&mut self, stat: StatKind, value: f64) {
        *self.percent.entry(stat).or_insert(0.0) += value;
    }

    /// Fold in an equipped item: base stats, bonus stats, soul effect, affix
    pub fn apply_item(&mut self, item: &Item) {
        for (stat, value) in item.base_stats.iter().chain(item.bonus_stats.iter()) {
            self.add_flat(*stat, *value);
        }
        if let Some(soul) = item.soul_effect {
            if soul.percent {
                self.add_percent(soul.stat, soul.value);
            } else {
                self.add_flat(soul.stat, soul.value);
            }
        }
        if let Some(affix) = item.affix {
            if affix.defense_bonus() > 0.0 {
                self.add_flat(StatKind::Defense, affix.defense_bonus());
            }
            if affix.penetration_bonus() > 0.0 {
                self.add_flat(StatKind::Penetration, affix.penetration_bonus());
            }
        }
    }

    /// Fold in a passive skill's Buff effects.
    ///
    /// A passive explicitly targeting evasion counts as skill-driven; other
    /// stats route like equipment bonuses. Active skills contribute nothing
    /// here.
    pub fn apply_passive_skill(&mut self, skill: &Skill) {
        if !skill.is_passive() {
            return;
        }
        for effect in &skill.effects {
            if effect.kind != EffectKind::Buff {
                continue;
            }
            let (Some(stat), Some(value)) = (effect.stat, effect.value) else {
                continue;
            };
            if effect.percent {
                self.add_percent(stat, value);
            } else if stat == StatKind::Evasion {
                self.add_skill_tier(stat, value);
            } else {
                self.add_flat(stat, value);
            }
        }
    }

    /// Fold in a learned technique.
    ///
    /// Movement techniques feed skill-driven evasion; attack techniques feed
    /// skill-driven accuracy and penetration. Everything else routes like
    /// equipment bonuses.
    pub fn apply_technique(&mut self, technique: &Technique) {
        for bonus in &technique.bonuses {
            if bonus.percent {
                self.add_percent(bonus.stat, bonus.value);
                continue;
            }
            match (technique.kind, bonus.stat) {
                (TechniqueKind::Movement, StatKind::Evasion) => {
                    self.add_skill_tier(bonus.stat, bonus.value)
                }
                (TechniqueKind::Attack, StatKind::Accuracy)
                | (TechniqueKind::Attack, StatKind::Penetration) => {
                    self.add_skill_tier(bonus.stat, bonus.value)
                }
                _ => self.add_flat(bonus.stat, bonus.value),
            }
        }
    }

    /// Fold in an active set bonus exactly like an equipment bonus
    pub fn apply_set_bonus(&mut self, bonus: &SetBonus) {
        if bonus.percent {
            self.add_percent(bonus.stat, bonus.value);
        } else {
            self.add_flat(bonus.stat, bonus.value);
        }
    }
}
