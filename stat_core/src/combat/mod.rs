//! Combat resolution

mod combatant;
mod resolution;
mod result;

pub use combatant::Combatant;
pub use resolution::{
    perform_attack, perform_attack_with_rng, tick_active_effects, use_skill, use_skill_with_rng,
    CombatError,
};
pub use result::{AttackResult, TickReport};
