//! stat_core - Stat derivation and combat resolution
//!
//! This library provides:
//! - BaseStats/DerivedStats: core attributes and their combat projection
//! - derive_stats: the pure derivation pipeline over gear, skills,
//!   techniques, set bonuses and support units
//! - Combat resolution: basic attacks, skill casts, per-turn effect ticks
//! - Classes, realms, skills and cultivation techniques
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stat_core::prelude::*;
//!
//! let class = standard_catalog().remove(0);
//! let stats = derive_stats(&DeriveInput::new(12, &class));
//! println!("HP {} / ATK {}", stats.max_hp, stats.physical_attack);
//!
//! // Combat runs over anything implementing Combatant
//! let result = perform_attack(&mut hero, &mut bandit);
//! for line in &result.messages {
//!     println!("{}", line);
//! }
//! ```

pub mod class;
pub mod combat;
pub mod config;
pub mod derive;
pub mod prelude;
pub mod realm;
pub mod skill;
pub mod technique;
pub mod types;

// Core API - what most users need
pub use combat::{
    perform_attack, perform_attack_with_rng, tick_active_effects, use_skill, use_skill_with_rng,
    AttackResult, CombatError, Combatant, TickReport,
};
pub use derive::{derive_stats, DeriveInput, DerivedStats, StatAccumulator};
pub use skill::{ActiveEffect, EffectKind, Skill, SkillEffect, SkillKind, Target};
pub use types::{AttackBasis, BaseStats, SupportTask, SupportUnit};

// Configuration
pub use config::{ensure_constants_initialized, init_constants, init_constants_default};

// Classes, realms and techniques
pub use class::{standard_catalog, CharacterClass, SkillUnlock};
pub use realm::{realm_for_level, realm_index, Realm, REALMS};
pub use technique::{Technique, TechniqueBonus, TechniqueKind};

// Re-export commonly needed loot_core types
pub use loot_core::{Affix, Item, ItemKind, Rarity, SetCatalog, StatKind};
