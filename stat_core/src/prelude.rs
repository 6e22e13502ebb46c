//! Convenience re-exports for the common path

pub use crate::class::{standard_catalog, CharacterClass, SkillUnlock};
pub use crate::combat::{
    perform_attack, tick_active_effects, use_skill, AttackResult, Combatant, TickReport,
};
pub use crate::config::{ensure_constants_initialized, init_constants, init_constants_default};
pub use crate::derive::{derive_stats, DeriveInput, DerivedStats};
pub use crate::realm::{realm_for_level, realm_index, Realm, REALMS};
pub use crate::skill::{ActiveEffect, EffectKind, Skill, SkillEffect, SkillKind, Target};
pub use crate::technique::{Technique, TechniqueKind};
pub use crate::types::{AttackBasis, BaseStats, SupportTask, SupportUnit};
pub use loot_core::{Item, ItemKind, Rarity, SetCatalog, StatKind};
