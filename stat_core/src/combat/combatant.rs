//! Combatant - the capability set combat resolution operates on
//!
//! Characters and pets implement this trait; resolution never needs to know
//! which concrete variant it is working with. The attack basis is an
//! explicit capability set at creation, not a class-name check.

use crate::derive::DerivedStats;
use crate::skill::{ActiveEffect, EffectKind};
use crate::types::AttackBasis;
use loot_core::Affix;

pub trait Combatant {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn level(&self) -> u32;
    fn attack_basis(&self) -> AttackBasis;
    fn stats(&self) -> &DerivedStats;
    fn current_hp(&self) -> f64;
    fn set_current_hp(&mut self, hp: f64);
    fn current_mp(&self) -> f64;
    fn set_current_mp(&mut self, mp: f64);
    fn active_effects(&self) -> &[ActiveEffect];
    fn active_effects_mut(&mut self) -> &mut Vec<ActiveEffect>;

    /// Affix on the equipped weapon, if any
    fn weapon_affix(&self) -> Option<Affix> {
        None
    }

    fn is_alive(&self) -> bool {
        self.current_hp() > 0.0
    }

    /// Reduce HP, clamped at zero
    fn take_damage(&mut self, amount: f64) {
        let hp = (self.current_hp() - amount).max(0.0);
        self.set_current_hp(hp);
    }

    /// Restore HP, clamped at the derived maximum
    fn heal(&mut self, amount: f64) {
        let hp = (self.current_hp() + amount).min(self.stats().max_hp);
        self.set_current_hp(hp);
    }

    /// Spend MP if available; returns false without mutation when short
    fn spend_mp(&mut self, amount: f64) -> bool {
        let mp = self.current_mp();
        if mp < amount {
            return false;
        }
        self.set_current_mp(mp - amount);
        true
    }

    /// Whether a stun effect is currently active (enforced by the turn
    /// orchestrator, not by this engine)
    fn is_stunned(&self) -> bool {
        self.active_effects()
            .iter()
            .any(|e| e.effect.kind == EffectKind::Stun && !e.is_expired())
    }

    /// Whether skill use is currently disabled
    fn skills_disabled(&self) -> bool {
        self.active_effects()
            .iter()
            .any(|e| e.effect.kind == EffectKind::DisableSkill && !e.is_expired())
    }
}
