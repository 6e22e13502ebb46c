//! Character classes - fixed standard archetypes and player-built custom classes

use crate::skill::{Skill, SkillEffect, SkillKind};
use crate::types::{AttackBasis, BaseStats};
use loot_core::StatKind;
use serde::{Deserialize, Serialize};

/// A predefined skill granted when the class reaches a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillUnlock {
    pub level: u32,
    pub skill: Skill,
}

/// Standard classes carry fixed growth and a predefined skill table;
/// custom classes grow by a player-assigned delta map and earn stat points
/// instead of table unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CharacterClass {
    Standard {
        id: String,
        name: String,
        /// Per-stat delta applied for every level beyond 1
        growth: BaseStats,
        /// One-time bonus scaled by (realm index + 1)
        realm_bonus: BaseStats,
        basis: AttackBasis,
        unlocks: Vec<SkillUnlock>,
    },
    Custom {
        name: String,
        /// Player-assigned per-level delta map
        growth: BaseStats,
        basis: AttackBasis,
    },
}

impl CharacterClass {
    pub fn name(&self) -> &str {
        match self {
            CharacterClass::Standard { name, .. } => name,
            CharacterClass::Custom { name, .. } => name,
        }
    }

    pub fn growth(&self) -> &BaseStats {
        match self {
            CharacterClass::Standard { growth, .. } => growth,
            CharacterClass::Custom { growth, .. } => growth,
        }
    }

    pub fn basis(&self) -> AttackBasis {
        match self {
            CharacterClass::Standard { basis, .. } => *basis,
            CharacterClass::Custom { basis, .. } => *basis,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, CharacterClass::Custom { .. })
    }

    /// Realm bonus for standard classes; custom classes have none
    pub fn realm_bonus(&self) -> Option<&BaseStats> {
        match self {
            CharacterClass::Standard { realm_bonus, .. } => Some(realm_bonus),
            CharacterClass::Custom { .. } => None,
        }
    }

    /// Predefined unlock table; empty for custom classes
    pub fn unlocks(&self) -> &[SkillUnlock] {
        match self {
            CharacterClass::Standard { unlocks, .. } => unlocks,
            CharacterClass::Custom { .. } => &[],
        }
    }

    /// Create a custom class from a player-assigned growth map
    pub fn custom(name: impl Into<String>, growth: BaseStats, basis: AttackBasis) -> Self {
        CharacterClass::Custom {
            name: name.into(),
            growth,
            basis,
        }
    }
}

/// The built-in standard classes
pub fn standard_catalog() -> Vec<CharacterClass> {
    vec![blade_disciple(), array_mage(), wind_walker(), spirit_healer()]
}

pub fn blade_disciple() -> CharacterClass {
    CharacterClass::Standard {
        id: "blade_disciple".to_string(),
        name: "Blade Disciple".to_string(),
        growth: BaseStats {
            strength: 3,
            agility: 1,
            constitution: 2,
            dexterity: 1,
            ..Default::default()
        },
        realm_bonus: BaseStats {
            strength: 2,
            constitution: 1,
            ..Default::default()
        },
        basis: AttackBasis::Physical,
        unlocks: vec![
            SkillUnlock {
                level: 3,
                skill: Skill::new("crescent_slash", "Crescent Slash", SkillKind::Active)
                    .with_mp_cost(8.0)
                    .with_required_level(3)
                    .with_effect(SkillEffect::damage(1.5, "A sweeping arc at 150% attack")),
            },
            SkillUnlock {
                level: 7,
                skill: Skill::new("war_roar", "War Roar", SkillKind::Active)
                    .with_mp_cost(12.0)
                    .with_required_level(7)
                    .with_effect(SkillEffect::buff(
                        StatKind::PhysicalAttack,
                        20.0,
                        true,
                        3,
                        "Bolsters attack for three turns",
                    )),
            },
        ],
    }
}

pub fn array_mage() -> CharacterClass {
    CharacterClass::Standard {
        id: "array_mage".to_string(),
        name: "Array Mage".to_string(),
        growth: BaseStats {
            intellect: 3,
            spirit: 2,
            dexterity: 1,
            constitution: 1,
            ..Default::default()
        },
        realm_bonus: BaseStats {
            intellect: 2,
            spirit: 1,
            ..Default::default()
        },
        basis: AttackBasis::Magical,
        unlocks: vec![
            SkillUnlock {
                level: 3,
                skill: Skill::new("flame_array", "Flame Array", SkillKind::Active)
                    .with_mp_cost(10.0)
                    .with_required_level(3)
                    .with_effect(SkillEffect::damage(1.6, "Ignites a sigil at 160% attack"))
                    .with_effect(
                        SkillEffect::dot(0.4, 2, "Lingering flames").with_chance(60.0),
                    ),
            },
            SkillUnlock {
                level: 8,
                skill: Skill::new("binding_array", "Binding Array", SkillKind::Active)
                    .with_mp_cost(14.0)
                    .with_required_level(8)
                    .with_effect(SkillEffect::stun(1, 50.0, "Roots the enemy in place")),
            },
        ],
    }
}

pub fn wind_walker() -> CharacterClass {
    CharacterClass::Standard {
        id: "wind_walker".to_string(),
        name: "Wind Walker".to_string(),
        growth: BaseStats {
            agility: 3,
            dexterity: 2,
            strength: 1,
            constitution: 1,
            ..Default::default()
        },
        realm_bonus: BaseStats {
            agility: 2,
            dexterity: 1,
            ..Default::default()
        },
        basis: AttackBasis::Physical,
        unlocks: vec![SkillUnlock {
            level: 5,
            skill: Skill::new("gale_step", "Gale Step", SkillKind::Passive)
                .with_required_level(5)
                .with_effect(SkillEffect::buff(
                    StatKind::Evasion,
                    8.0,
                    false,
                    1,
                    "Footwork honed against the wind",
                )),
        }],
    }
}

pub fn spirit_healer() -> CharacterClass {
    CharacterClass::Standard {
        id: "spirit_healer".to_string(),
        name: "Spirit Healer".to_string(),
        growth: BaseStats {
            spirit: 3,
            intellect: 2,
            constitution: 1,
            agility: 1,
            ..Default::default()
        },
        realm_bonus: BaseStats {
            spirit: 2,
            constitution: 1,
            ..Default::default()
        },
        basis: AttackBasis::Magical,
        unlocks: vec![SkillUnlock {
            level: 4,
            skill: Skill::new("vitality_infusion", "Vitality Infusion", SkillKind::Active)
                .with_mp_cost(10.0)
                .with_required_level(4)
                .with_effect(SkillEffect::heal(1.2, 15.0, "Channels spirit into flesh")),
        }],
    }
}
