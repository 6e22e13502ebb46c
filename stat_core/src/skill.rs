//! Skills and their effects
//!
//! A skill is an immutable ordered list of tagged effects. Combat resolution
//! walks the list; buffs, debuffs, DoTs and the like become ActiveEffect
//! instances bound to a remaining-turn counter on whichever combatant they
//! land on.

use loot_core::StatKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Active,
    Passive,
}

/// Who an effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Caster,
    Enemy,
}

/// Tagged effect variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Damage,
    Heal,
    Buff,
    Debuff,
    /// Damage over time, ticked once per turn by the orchestrator
    Dot,
    /// Heal over time
    Hot,
    Stun,
    DisableSkill,
}

/// One effect inside a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub kind: EffectKind,
    pub target: Target,
    /// Stat affected by Buff/Debuff effects
    #[serde(default)]
    pub stat: Option<StatKind>,
    /// Multiplier of the caster's relevant attack stat (1.5 = 150%)
    #[serde(default)]
    pub power: Option<f64>,
    /// Flat value added on top of the scaled component
    #[serde(default)]
    pub value: Option<f64>,
    /// Whether `value` is a percent rather than a flat amount
    #[serde(default)]
    pub percent: bool,
    /// Turns the instantiated effect lasts; defaults to 1 when omitted
    #[serde(default)]
    pub duration: Option<u32>,
    /// Trigger chance in percent; a failed roll skips only this effect
    #[serde(default)]
    pub chance: Option<f64>,
    /// Damage-only penetration bonus, added before the combined cap
    #[serde(default)]
    pub pen_bonus: Option<f64>,
    pub description: String,
}

impl SkillEffect {
    fn base(kind: EffectKind, target: Target, description: impl Into<String>) -> Self {
        SkillEffect {
            kind,
            target,
            stat: None,
            power: None,
            value: None,
            percent: false,
            duration: None,
            chance: None,
            pen_bonus: None,
            description: description.into(),
        }
    }

    /// Damage the enemy for `power` x the caster's attack stat
    pub fn damage(power: f64, description: impl Into<String>) -> Self {
        SkillEffect {
            power: Some(power),
            ..Self::base(EffectKind::Damage, Target::Enemy, description)
        }
    }

    /// Heal the caster for `power` x magical attack plus `flat`
    pub fn heal(power: f64, flat: f64, description: impl Into<String>) -> Self {
        SkillEffect {
            power: Some(power),
            value: Some(flat),
            ..Self::base(EffectKind::Heal, Target::Caster, description)
        }
    }

    /// Buff a stat on the caster for a number of turns
    pub fn buff(
        stat: StatKind,
        value: f64,
        percent: bool,
        duration: u32,
        description: impl Into<String>,
    ) -> Self {
        SkillEffect {
            stat: Some(stat),
            value: Some(value),
            percent,
            duration: Some(duration),
            ..Self::base(EffectKind::Buff, Target::Caster, description)
        }
    }

    /// Debuff a stat on the enemy for a number of turns
    pub fn debuff(
        stat: StatKind,
        value: f64,
        percent: bool,
        duration: u32,
        description: impl Into<String>,
    ) -> Self {
        SkillEffect {
            stat: Some(stat),
            value: Some(value),
            percent,
            duration: Some(duration),
            ..Self::base(EffectKind::Debuff, Target::Enemy, description)
        }
    }

    /// Damage-over-time on the enemy
    pub fn dot(power: f64, duration: u32, description: impl Into<String>) -> Self {
        SkillEffect {
            power: Some(power),
            duration: Some(duration),
            ..Self::base(EffectKind::Dot, Target::Enemy, description)
        }
    }

    /// Heal-over-time on the caster
    pub fn hot(power: f64, duration: u32, description: impl Into<String>) -> Self {
        SkillEffect {
            power: Some(power),
            duration: Some(duration),
            ..Self::base(EffectKind::Hot, Target::Caster, description)
        }
    }

    /// Stun the enemy
    pub fn stun(duration: u32, chance: f64, description: impl Into<String>) -> Self {
        SkillEffect {
            duration: Some(duration),
            chance: Some(chance),
            ..Self::base(EffectKind::Stun, Target::Enemy, description)
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn with_pen_bonus(mut self, pen_bonus: f64) -> Self {
        self.pen_bonus = Some(pen_bonus);
        self
    }

    pub fn with_flat(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// An immutable skill definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub kind: SkillKind,
    #[serde(default)]
    pub required_level: u32,
    /// Realm index gate, if any
    #[serde(default)]
    pub required_realm: Option<usize>,
    #[serde(default)]
    pub mp_cost: Option<f64>,
    /// Granted by a realm breakthrough
    #[serde(default)]
    pub realm_skill: bool,
    pub effects: Vec<SkillEffect>,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SkillKind) -> Self {
        Skill {
            id: id.into(),
            name: name.into(),
            kind,
            required_level: 0,
            required_realm: None,
            mp_cost: None,
            realm_skill: false,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_mp_cost(mut self, cost: f64) -> Self {
        self.mp_cost = Some(cost);
        self
    }

    pub fn with_required_level(mut self, level: u32) -> Self {
        self.required_level = level;
        self
    }

    pub fn is_passive(&self) -> bool {
        self.kind == SkillKind::Passive
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(cost) = self.mp_cost {
            write!(f, " ({} MP)", cost)?;
        }
        Ok(())
    }
}

/// An instantiated effect bound to a remaining-turn counter.
///
/// Owned by whichever combatant it is currently affecting; removed when the
/// counter reaches zero or combat ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub effect: SkillEffect,
    pub remaining_turns: u32,
    /// Per-turn amount resolved from the caster's stats at application time
    /// (DoT and HoT only)
    #[serde(default)]
    pub magnitude: f64,
    /// Name of the combatant that applied the effect
    pub source: String,
}

impl ActiveEffect {
    pub fn new(effect: SkillEffect, magnitude: f64, source: impl Into<String>) -> Self {
        let remaining_turns = effect.duration.unwrap_or(1);
        ActiveEffect {
            effect,
            remaining_turns,
            magnitude,
            source: source.into(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_turns == 0
    }

    /// Consume one turn, returning true while the effect remains active
    pub fn tick(&mut self) -> bool {
        self.remaining_turns = self.remaining_turns.saturating_sub(1);
        self.remaining_turns > 0
    }
}
