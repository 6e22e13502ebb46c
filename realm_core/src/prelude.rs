//! Convenience re-exports for the common path

pub use crate::character::{Character, CharacterError, Pet};
pub use crate::content::{GrowthContentPort, OfflineGrowth};
pub use crate::loot::{generate_item_for, learn_from_tome, GeneratedItem};
pub use crate::progression::{
    exp_to_next_level, gain_exp, gain_exp_with_content, gain_pet_exp, LevelUpReport,
};
pub use loot_core::{GenerateRequest, Generator, Item, ItemContentPort, ItemKind, Rarity};
pub use stat_core::{
    perform_attack, tick_active_effects, use_skill, AttackResult, Combatant, DerivedStats,
};
