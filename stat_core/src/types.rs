//! Core value types shared across derivation and combat

use loot_core::StatKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six core attributes every character and pet owns.
///
/// Mutated only by level-up accrual or explicit point allocation; everything
/// combat-facing is derived from these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub strength: i32,
    pub agility: i32,
    pub intellect: i32,
    pub spirit: i32,
    pub constitution: i32,
    pub dexterity: i32,
}

impl BaseStats {
    /// All six attributes at the same value
    pub fn uniform(value: i32) -> Self {
        BaseStats {
            strength: value,
            agility: value,
            intellect: value,
            spirit: value,
            constitution: value,
            dexterity: value,
        }
    }

    /// The fixed starting line every derivation begins from
    pub fn base_line() -> Self {
        Self::uniform(10)
    }

    pub fn get(&self, stat: StatKind) -> Option<i32> {
        match stat {
            StatKind::Strength => Some(self.strength),
            StatKind::Agility => Some(self.agility),
            StatKind::Intellect => Some(self.intellect),
            StatKind::Spirit => Some(self.spirit),
            StatKind::Constitution => Some(self.constitution),
            StatKind::Dexterity => Some(self.dexterity),
            _ => None,
        }
    }

    /// Add to one attribute; returns false for non-core keys, which are
    /// ignored rather than raised (forward compatibility)
    pub fn add_stat(&mut self, stat: StatKind, value: i32) -> bool {
        match stat {
            StatKind::Strength => self.strength += value,
            StatKind::Agility => self.agility += value,
            StatKind::Intellect => self.intellect += value,
            StatKind::Spirit => self.spirit += value,
            StatKind::Constitution => self.constitution += value,
            StatKind::Dexterity => self.dexterity += value,
            _ => return false,
        }
        true
    }

    /// Add `other` scaled by `times` to every attribute
    pub fn add_scaled(&mut self, other: &BaseStats, times: i32) {
        self.strength += other.strength * times;
        self.agility += other.agility * times;
        self.intellect += other.intellect * times;
        self.spirit += other.spirit * times;
        self.constitution += other.constitution * times;
        self.dexterity += other.dexterity * times;
    }

    /// Sum of all six attributes
    pub fn total(&self) -> i32 {
        self.strength
            + self.agility
            + self.intellect
            + self.spirit
            + self.constitution
            + self.dexterity
    }
}

/// Which attack stat a combatant swings with.
///
/// Set once at creation from the class, instead of sniffing class-name
/// strings at resolution time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackBasis {
    #[default]
    Physical,
    Magical,
}

/// Task a support unit is currently assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportTask {
    /// Contributes 0.5 x level to the owner's defense
    Guard,
    Gather,
    Train,
    Idle,
}

/// A retainer assigned to a task; only guards affect derived stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportUnit {
    pub name: String,
    pub level: u32,
    pub task: SupportTask,
}

impl SupportUnit {
    pub fn new(name: impl Into<String>, level: u32, task: SupportTask) -> Self {
        SupportUnit {
            name: name.into(),
            level,
            task,
        }
    }
}

impl fmt::Display for SupportUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Lv.{})", self.name, self.level)
    }
}
