//! Stat derivation - projecting combat stats from every bonus source
//!
//! `derive_stats` is pure and total: identical inputs always produce
//! identical output, missing inputs default to empty, and nothing here rolls
//! dice. DerivedStats has no lifecycle of its own - callers recompute it
//! whenever an input changes and clamp current HP/MP themselves.

mod accumulator;

pub use accumulator::StatAccumulator;

use crate::class::CharacterClass;
use crate::config::{constants, ensure_constants_initialized};
use crate::realm::realm_index;
use crate::skill::Skill;
use crate::technique::Technique;
use crate::types::{BaseStats, SupportTask, SupportUnit};
use loot_core::{Item, SetCatalog, StatKind};
use serde::{Deserialize, Serialize};

/// Defense contributed per level of a guarding support unit
const GUARD_DEFENSE_PER_LEVEL: f64 = 0.5;

/// The combat-usable stat block, fully recomputed on every derivation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_hp: f64,
    pub max_mp: f64,
    pub physical_attack: f64,
    pub magical_attack: f64,
    pub defense: f64,
    pub speed: f64,
    /// Percent chance to crit
    pub crit_rate: f64,
    /// Percent, capped at 95 combined
    pub accuracy: f64,
    /// Percent, capped at 80 combined
    pub evasion: f64,
    /// Percent reduction of opposing defense, capped at 80 combined
    pub penetration: f64,
    /// Percent of final damage returned as healing
    pub lifesteal: f64,
    pub elemental_damage: f64,
    pub elemental_resist: f64,
}

/// Inputs to one derivation pass; missing inputs default to empty
#[derive(Debug, Clone, Copy)]
pub struct DeriveInput<'a> {
    pub level: u32,
    pub class: &'a CharacterClass,
    /// Extra allocated points (custom classes), added on top of growth
    pub allocation: Option<&'a BaseStats>,
    pub equipment: &'a [&'a Item],
    /// Learned skills; only passives contribute
    pub skills: &'a [Skill],
    /// All learned techniques contribute, active or not
    pub techniques: &'a [Technique],
    pub support_units: &'a [SupportUnit],
    pub set_catalog: Option<&'a SetCatalog>,
}

impl<'a> DeriveInput<'a> {
    pub fn new(level: u32, class: &'a CharacterClass) -> Self {
        DeriveInput {
            level,
            class,
            allocation: None,
            equipment: &[],
            skills: &[],
            techniques: &[],
            support_units: &[],
            set_catalog: None,
        }
    }

    pub fn with_allocation(mut self, allocation: &'a BaseStats) -> Self {
        self.allocation = Some(allocation);
        self
    }

    pub fn with_equipment(mut self, equipment: &'a [&'a Item]) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_skills(mut self, skills: &'a [Skill]) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_techniques(mut self, techniques: &'a [Technique]) -> Self {
        self.techniques = techniques;
        self
    }

    pub fn with_support_units(mut self, support_units: &'a [SupportUnit]) -> Self {
        self.support_units = support_units;
        self
    }

    pub fn with_set_catalog(mut self, set_catalog: &'a SetCatalog) -> Self {
        self.set_catalog = Some(set_catalog);
        self
    }
}

/// Project a combat stat block from the given inputs
pub fn derive_stats(input: &DeriveInput) -> DerivedStats {
    ensure_constants_initialized();
    let caps = &constants().caps;
    let level = input.level.max(1);
    let level_f = level as f64;

    // Step 1: core attributes - base line, per-level class growth, and for
    // standard classes a realm bonus scaled by (realm index + 1)
    let mut core = BaseStats::base_line();
    core.add_scaled(input.class.growth(), (level - 1) as i32);
    if let Some(bonus) = input.class.realm_bonus() {
        core.add_scaled(bonus, realm_index(level) as i32 + 1);
    }
    if let Some(allocation) = input.allocation {
        core.add_scaled(allocation, 1);
    }

    // Steps 2-4: accumulate flat and percent bonuses from every source
    let mut acc = StatAccumulator::new();
    acc.seed_core(&core);
    for item in input.equipment {
        acc.apply_item(item);
    }
    for skill in input.skills {
        acc.apply_passive_skill(skill);
    }
    for technique in input.techniques {
        acc.apply_technique(technique);
    }
    if let Some(catalog) = input.set_catalog {
        for bonus in catalog.active_bonuses(input.equipment) {
            acc.apply_set_bonus(&bonus);
        }
    }

    // Step 5: base derived stats from the accumulated core attributes
    let mut stats = DerivedStats {
        max_hp: acc.constitution * 15.0 + level_f * 5.0,
        max_mp: acc.intellect * 5.0 + acc.spirit * 5.0 + level_f * 2.0,
        physical_attack: acc.strength * 2.0 + level_f * 0.5,
        magical_attack: acc.intellect * 2.5 + level_f * 0.5,
        defense: acc.constitution * 1.5 + level_f * 0.5,
        speed: acc.agility * 1.1 + level_f * 0.1,
        crit_rate: acc.dexterity * 0.6 + acc.agility * 0.4 + level_f * 0.1,
        ..Default::default()
    };

    // Step 6: two-tier capped stats - gear-driven and skill-driven sources
    // cap separately before the combined total caps
    let gear_evasion = ((acc.agility + acc.dexterity) * 0.6 + level_f * 0.1 + acc.gear_evasion)
        .min(caps.evasion_gear_cap);
    let skill_evasion = acc.skill_evasion.min(caps.evasion_skill_cap);
    stats.evasion = (gear_evasion + skill_evasion).min(caps.evasion_total_cap);

    let gear_accuracy =
        (acc.dexterity * 1.5 + level_f * 0.3 + acc.gear_accuracy).min(caps.accuracy_gear_cap);
    let skill_accuracy = acc.skill_accuracy.min(caps.accuracy_skill_cap);
    stats.accuracy = (gear_accuracy + skill_accuracy).min(caps.accuracy_total_cap);

    let gear_penetration = (acc.strength * 0.1 + level_f * 0.05 + acc.gear_penetration)
        .min(caps.penetration_gear_cap);
    let skill_penetration = acc.skill_penetration.min(caps.penetration_skill_cap);
    stats.penetration = (gear_penetration + skill_penetration).min(caps.penetration_total_cap);

    // Step 7: remaining flat bonus-derived stats, in sorted key order
    let mut flat: Vec<(StatKind, f64)> = acc.flat.iter().map(|(k, v)| (*k, *v)).collect();
    flat.sort_by_key(|(k, _)| *k);
    for (stat, value) in flat {
        if let Some(field) = stat_field_mut(&mut stats, stat) {
            *field += value;
        }
    }

    // Step 8: one multiplicative percent pass per targeted stat
    let mut percent: Vec<(StatKind, f64)> = acc.percent.iter().map(|(k, v)| (*k, *v)).collect();
    percent.sort_by_key(|(k, _)| *k);
    for (stat, pct) in percent {
        if let Some(field) = stat_field_mut(&mut stats, stat) {
            *field *= 1.0 + pct / 100.0;
        }
    }
    // Percent bonuses cannot push the capped trio past their ceilings
    stats.evasion = stats.evasion.min(caps.evasion_total_cap);
    stats.accuracy = stats.accuracy.min(caps.accuracy_total_cap);
    stats.penetration = stats.penetration.min(caps.penetration_total_cap);

    // Step 9: guarding support units add defense
    for unit in input.support_units {
        if unit.task == SupportTask::Guard {
            stats.defense += GUARD_DEFENSE_PER_LEVEL * unit.level as f64;
        }
    }

    // Step 10: HP/MP floor to whole points, the rest rounds for stable
    // display and comparison
    stats.max_hp = stats.max_hp.floor();
    stats.max_mp = stats.max_mp.floor();
    stats.physical_attack = round2(stats.physical_attack);
    stats.magical_attack = round2(stats.magical_attack);
    stats.defense = round2(stats.defense);
    stats.speed = round2(stats.speed);
    stats.crit_rate = round2(stats.crit_rate);
    stats.accuracy = round2(stats.accuracy);
    stats.evasion = round2(stats.evasion);
    stats.penetration = round2(stats.penetration);
    stats.lifesteal = round2(stats.lifesteal);
    stats.elemental_damage = round2(stats.elemental_damage);
    stats.elemental_resist = round2(stats.elemental_resist);

    stats
}

/// Field for a derived-stat key; core attributes and unknown keys have none
fn stat_field_mut(stats: &mut DerivedStats, stat: StatKind) -> Option<&mut f64> {
    match stat {
        StatKind::MaxHp => Some(&mut stats.max_hp),
        StatKind::MaxMp => Some(&mut stats.max_mp),
        StatKind::PhysicalAttack => Some(&mut stats.physical_attack),
        StatKind::MagicalAttack => Some(&mut stats.magical_attack),
        StatKind::Defense => Some(&mut stats.defense),
        StatKind::Speed => Some(&mut stats.speed),
        StatKind::CritRate => Some(&mut stats.crit_rate),
        StatKind::Accuracy => Some(&mut stats.accuracy),
        StatKind::Evasion => Some(&mut stats.evasion),
        StatKind::Penetration => Some(&mut stats.penetration),
        StatKind::Lifesteal => Some(&mut stats.lifesteal),
        StatKind::ElementalDamage => Some(&mut stats.elemental_damage),
        StatKind::ElementalResist => Some(&mut stats.elemental_resist),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
