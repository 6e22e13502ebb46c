//! realm_core - Character progression and content-service orchestration
//!
//! This library provides:
//! - Character/Pet: the concrete combatants, with equipment, skills,
//!   techniques and cached derived stats
//! - Progression: the experience/level/realm state machine
//! - GrowthContentPort: the async content-service seam, with deterministic
//!   local fallbacks for every request
//! - Item orchestration: loot generation with tome/manual payloads
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use realm_core::prelude::*;
//! use stat_core::class::blade_disciple;
//!
//! let mut hero = Character::new("c1", "Shen", blade_disciple());
//! let report = gain_exp(&mut hero, 2_500);
//! for line in &report.messages {
//!     println!("{}", line);
//! }
//! ```

pub mod character;
pub mod content;
pub mod loot;
pub mod prelude;
pub mod progression;

// Core API - what most users need
pub use character::{Character, CharacterError, Pet};
pub use progression::{
    exp_to_next_level, gain_exp, gain_exp_with_content, gain_pet_exp, LevelUpReport,
    CUSTOM_SKILL_INTERVAL, STAT_POINTS_PER_LEVEL,
};

// Content-service port and fallbacks
pub use content::{
    fallback_realm_skill, fallback_skill, fallback_technique, GrowthContentPort, OfflineGrowth,
};

// Item orchestration
pub use loot::{generate_item_for, learn_from_tome, GeneratedItem};
