//! AttackResult - outcome of a resolved action

use crate::skill::ActiveEffect;
use serde::{Deserialize, Serialize};

/// Result of one resolved attack or skill cast.
///
/// Healing composes through the same plumbing as negative `damage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttackResult {
    /// Net damage dealt to the enemy (negative when the action healed)
    pub damage: f64,
    pub crit: bool,
    /// Basic attack: the whole action missed. Skill: at least one damage
    /// effect missed (other effects still resolved).
    pub miss: bool,
    /// Amount healed back to the attacker through lifesteal
    pub lifesteal: f64,
    /// Extra flat damage echoed by a weapon affix
    pub echo_damage: f64,
    /// Effects instantiated on either combatant by this action
    pub effects_applied: Vec<ActiveEffect>,
    pub messages: Vec<String>,
}

impl AttackResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total damage including the affix echo
    pub fn total_damage(&self) -> f64 {
        self.damage + self.echo_damage
    }

    pub fn is_heal(&self) -> bool {
        self.damage < 0.0
    }
}

/// Outcome of ticking a combatant's over-time effects for one turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    /// Damage dealt by DoT effects this turn
    pub damage: f64,
    /// Healing applied by HoT effects this turn
    pub healing: f64,
    /// Descriptions of effects that expired this turn
    pub expired: Vec<String>,
    pub messages: Vec<String>,
}
