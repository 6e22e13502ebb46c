//! Combat resolution - basic attacks, skill casts and per-turn effect ticks
//!
//! Each call resolves a single (attacker, defender, action) triple; turn
//! sequencing and tactic selection live with the caller. Nothing here
//! persists between calls beyond the mutations applied to the combatants.

use super::combatant::Combatant;
use super::result::{AttackResult, TickReport};
use crate::config::{constants, ensure_constants_initialized, GameConstants};
use crate::skill::{ActiveEffect, EffectKind, Skill, Target};
use crate::types::AttackBasis;
use loot_core::StatKind;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("not enough MP for {skill}: need {need}, have {have}")]
    InsufficientMp {
        skill: String,
        need: f64,
        have: f64,
    },
    #[error("{skill} is a passive skill and cannot be activated")]
    NotActivatable { skill: String },
}

/// Resolve a basic attack (RNG handled internally)
pub fn perform_attack(attacker: &mut dyn Combatant, defender: &mut dyn Combatant) -> AttackResult {
    let mut rng = rand::thread_rng();
    perform_attack_with_rng(attacker, defender, &mut rng)
}

/// Resolve a basic attack with a provided RNG (for deterministic testing)
pub fn perform_attack_with_rng<R: Rng>(
    attacker: &mut dyn Combatant,
    defender: &mut dyn Combatant,
    rng: &mut R,
) -> AttackResult {
    ensure_constants_initialized();
    let cfg = constants();
    let mut result = AttackResult::new();

    // Step 1: hit check - pure clamp of base + accuracy - evasion
    let chance = hit_chance(cfg.hit.base_chance, &*attacker, &*defender, cfg);
    if rng.gen_range(0.0..100.0) > chance {
        result.miss = true;
        result
            .messages
            .push(format!("{} misses {}", attacker.name(), defender.name()));
        return result;
    }

    // Step 2: crit check
    let crit = rng.gen_range(0.0..100.0) < combat_stat(&*attacker, StatKind::CritRate);

    // Step 3: attack basis selects the damage stat
    let mut base = attack_stat(&*attacker);
    if crit {
        base *= cfg.crit.multiplier;
    }

    // Step 4: penetration-reduced defense mitigation
    let damage = mitigate(base, &*attacker, &*defender, 0.0, cfg);
    defender.take_damage(damage);
    result.damage = damage;
    result.crit = crit;
    result.messages.push(format!(
        "{} hits {} for {} damage{}",
        attacker.name(),
        defender.name(),
        damage,
        if crit { " (critical)" } else { "" }
    ));

    // Step 5: lifesteal - armament affix and stat percent stack additively
    let lifesteal_percent = attacker.stats().lifesteal
        + attacker
            .weapon_affix()
            .map_or(0.0, |affix| affix.lifesteal_percent());
    if lifesteal_percent > 0.0 {
        let healed = damage * lifesteal_percent / 100.0;
        attacker.heal(healed);
        result.lifesteal = healed;
        result
            .messages
            .push(format!("{} drains {:.1} HP", attacker.name(), healed));
    }

    // Step 6: affix echo appends extra flat damage
    if let Some(affix) = attacker.weapon_affix() {
        if affix.echo_percent() > 0.0 {
            let echo = (damage * affix.echo_percent() / 100.0).floor();
            if echo > 0.0 {
                defender.take_damage(echo);
                result.echo_damage = echo;
                result
                    .messages
                    .push(format!("the blow echoes for {} damage", echo));
            }
        }
    }

    debug!(
        attacker = attacker.id(),
        defender = defender.id(),
        damage = result.damage,
        crit = result.crit,
        "attack resolved"
    );
    result
}

/// Resolve a skill cast (RNG handled internally)
pub fn use_skill(
    attacker: &mut dyn Combatant,
    defender: &mut dyn Combatant,
    skill: &Skill,
) -> Result<AttackResult, CombatError> {
    let mut rng = rand::thread_rng();
    use_skill_with_rng(attacker, defender, skill, &mut rng)
}

/// Resolve a skill cast with a provided RNG.
///
/// Effects resolve in order; each rolls its own trigger chance and a missed
/// Damage effect cancels only itself.
pub fn use_skill_with_rng<R: Rng>(
    attacker: &mut dyn Combatant,
    defender: &mut dyn Combatant,
    skill: &Skill,
    rng: &mut R,
) -> Result<AttackResult, CombatError> {
    ensure_constants_initialized();
    let cfg = constants();

    if skill.is_passive() {
        return Err(CombatError::NotActivatable {
            skill: skill.name.clone(),
        });
    }
    let cost = skill.mp_cost.unwrap_or(0.0);
    if !attacker.spend_mp(cost) {
        return Err(CombatError::InsufficientMp {
            skill: skill.name.clone(),
            need: cost,
            have: attacker.current_mp(),
        });
    }

    let mut result = AttackResult::new();
    result
        .messages
        .push(format!("{} uses {}", attacker.name(), skill.name));

    for effect in &skill.effects {
        // Independent trigger roll per effect
        if let Some(trigger) = effect.chance {
            if rng.gen_range(0.0..100.0) > trigger {
                result
                    .messages
                    .push(format!("{} fails to trigger", effect.description));
                continue;
            }
        }

        match effect.kind {
            EffectKind::Damage => {
                // Skill damage uses a higher hit baseline than basic attacks
                let chance = hit_chance(cfg.hit.skill_base_chance, &*attacker, &*defender, cfg);
                if rng.gen_range(0.0..100.0) > chance {
                    result.miss = true;
                    result
                        .messages
                        .push(format!("{} misses {}", skill.name, defender.name()));
                    continue;
                }
                let crit = rng.gen_range(0.0..100.0) < combat_stat(&*attacker, StatKind::CritRate);
                let mut base = attack_stat(&*attacker) * effect.power.unwrap_or(1.0)
                    + effect.value.unwrap_or(0.0);
                if crit {
                    base *= cfg.crit.multiplier;
                    result.crit = true;
                }
                let damage = mitigate(
                    base,
                    &*attacker,
                    &*defender,
                    effect.pen_bonus.unwrap_or(0.0),
                    cfg,
                );
                defender.take_damage(damage);
                result.damage += damage;
                result.messages.push(format!(
                    "{} strikes {} for {} damage{}",
                    skill.name,
                    defender.name(),
                    damage,
                    if crit { " (critical)" } else { "" }
                ));
            }
            EffectKind::Heal => {
                let amount = (combat_stat(&*attacker, StatKind::MagicalAttack)
                    * effect.power.unwrap_or(1.0)
                    + effect.value.unwrap_or(0.0))
                .floor();
                let target_name = match effect.target {
                    Target::Caster => {
                        attacker.heal(amount);
                        attacker.name().to_string()
                    }
                    Target::Enemy => {
                        defender.heal(amount);
                        defender.name().to_string()
                    }
                };
                // Healing is negative damage so it shares the result plumbing
                result.damage -= amount;
                result
                    .messages
                    .push(format!("{} restores {} HP to {}", skill.name, amount, target_name));
            }
            EffectKind::Buff
            | EffectKind::Debuff
            | EffectKind::Dot
            | EffectKind::Hot
            | EffectKind::Stun
            | EffectKind::DisableSkill => {
                // Per-turn amounts resolve from the caster's stats now; the
                // turn orchestrator ticks them without the caster in scope
                let magnitude = match effect.kind {
                    EffectKind::Dot => (attack_stat(&*attacker) * effect.power.unwrap_or(0.0)
                        + effect.value.unwrap_or(0.0))
                    .floor(),
                    EffectKind::Hot => (combat_stat(&*attacker, StatKind::MagicalAttack)
                        * effect.power.unwrap_or(0.0)
                        + effect.value.unwrap_or(0.0))
                    .floor(),
                    _ => 0.0,
                };
                let active = ActiveEffect::new(effect.clone(), magnitude, attacker.name());
                match effect.target {
                    Target::Caster => attacker.active_effects_mut().push(active.clone()),
                    Target::Enemy => defender.active_effects_mut().push(active.clone()),
                }
                result
                    .messages
                    .push(format!("{} takes effect", effect.description));
                result.effects_applied.push(active);
            }
        }
    }

    debug!(
        attacker = attacker.id(),
        skill = skill.id.as_str(),
        damage = result.damage,
        "skill resolved"
    );
    Ok(result)
}

/// Apply one combat turn's worth of over-time effects to a combatant.
///
/// The turn orchestrator calls this once per turn; DoT/HoT amounts were
/// resolved at application time with the same damage/heal math.
pub fn tick_active_effects(target: &mut dyn Combatant) -> TickReport {
    let mut report = TickReport::default();
    let mut effects = std::mem::take(target.active_effects_mut());

    for active in &mut effects {
        match active.effect.kind {
            EffectKind::Dot => {
                target.take_damage(active.magnitude);
                report.damage += active.magnitude;
                report.messages.push(format!(
                    "{} suffers {} damage from {}",
                    target.name(),
                    active.magnitude,
                    active.effect.description
                ));
            }
            EffectKind::Hot => {
                target.heal(active.magnitude);
                report.healing += active.magnitude;
                report.messages.push(format!(
                    "{} recovers {} HP from {}",
                    target.name(),
                    active.magnitude,
                    active.effect.description
                ));
            }
            _ => {}
        }
        active.tick();
    }

    let (expired, remaining): (Vec<ActiveEffect>, Vec<ActiveEffect>) =
        effects.into_iter().partition(|e| e.is_expired());
    for effect in &expired {
        report.expired.push(effect.effect.description.clone());
    }
    *target.active_effects_mut() = remaining;
    report
}

/// Hit chance: clamp(base + attacker accuracy - defender evasion)
fn hit_chance(
    base: f64,
    attacker: &dyn Combatant,
    defender: &dyn Combatant,
    cfg: &GameConstants,
) -> f64 {
    let accuracy = combat_stat(attacker, StatKind::Accuracy);
    let evasion = combat_stat(defender, StatKind::Evasion);
    (base + accuracy - evasion).clamp(cfg.hit.min_chance, cfg.hit.max_chance)
}

/// Damage stat selected by the combatant's attack basis
fn attack_stat(combatant: &dyn Combatant) -> f64 {
    match combatant.attack_basis() {
        AttackBasis::Physical => combat_stat(combatant, StatKind::PhysicalAttack),
        AttackBasis::Magical => combat_stat(combatant, StatKind::MagicalAttack),
    }
}

/// Mitigation: penetration shrinks defense as a percentage, then the
/// remaining defense converts to a reduction against the attacker's level.
/// The denominator always includes level x constant >= 20, so it cannot be
/// zero.
fn mitigate(
    base: f64,
    attacker: &dyn Combatant,
    defender: &dyn Combatant,
    pen_bonus: f64,
    cfg: &GameConstants,
) -> f64 {
    let penetration = (combat_stat(attacker, StatKind::Penetration) + pen_bonus)
        .min(cfg.caps.penetration_total_cap);
    let effective_defense =
        combat_stat(defender, StatKind::Defense).max(0.0) * (1.0 - penetration / 100.0);
    let reduction = effective_defense
        / (effective_defense + attacker.level().max(1) as f64 * cfg.mitigation.level_constant);
    (base * (1.0 - reduction))
        .floor()
        .max(cfg.mitigation.minimum_damage)
}

/// A derived stat adjusted by currently active buffs and debuffs.
///
/// Flat adjustments sum, then one multiplicative percent pass, floored at
/// zero.
fn combat_stat(combatant: &dyn Combatant, stat: StatKind) -> f64 {
    let base = match stat {
        StatKind::MaxHp => combatant.stats().max_hp,
        StatKind::MaxMp => combatant.stats().max_mp,
        StatKind::PhysicalAttack => combatant.stats().physical_attack,
        StatKind::MagicalAttack => combatant.stats().magical_attack,
        StatKind::Defense => combatant.stats().defense,
        StatKind::Speed => combatant.stats().speed,
        StatKind::CritRate => combatant.stats().crit_rate,
        StatKind::Accuracy => combatant.stats().accuracy,
        StatKind::Evasion => combatant.stats().evasion,
        StatKind::Penetration => combatant.stats().penetration,
        StatKind::Lifesteal => combatant.stats().lifesteal,
        StatKind::ElementalDamage => combatant.stats().elemental_damage,
        StatKind::ElementalResist => combatant.stats().elemental_resist,
        _ => 0.0,
    };

    let mut flat = 0.0;
    let mut percent = 0.0;
    for active in combatant.active_effects() {
        if active.is_expired() || active.effect.stat != Some(stat) {
            continue;
        }
        let sign = match active.effect.kind {
            EffectKind::Buff => 1.0,
            EffectKind::Debuff => -1.0,
            _ => continue,
        };
        let value = active.effect.value.unwrap_or(0.0);
        if active.effect.percent {
            percent += sign * value;
        } else {
            flat += sign * value;
        }
    }
    ((base + flat) * (1.0 + percent / 100.0)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::DerivedStats;
    use loot_core::Affix;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Dummy {
        id: String,
        name: String,
        level: u32,
        basis: AttackBasis,
        stats: DerivedStats,
        hp: f64,
        mp: f64,
        effects: Vec<ActiveEffect>,
        affix: Option<Affix>,
    }

    impl Dummy {
        fn new(name: &str, level: u32, stats: DerivedStats) -> Self {
            Dummy {
                id: name.to_lowercase(),
                name: name.to_string(),
                level,
                basis: AttackBasis::Physical,
                stats,
                hp: stats.max_hp,
                mp: stats.max_mp,
                effects: Vec::new(),
                affix: None,
            }
        }
    }

    impl Combatant for Dummy {
        fn id(&self) -> &str {
            &self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn level(&self) -> u32 {
            self.level
        }
        fn attack_basis(&self) -> AttackBasis {
            self.basis
        }
        fn stats(&self) -> &DerivedStats {
            &self.stats
        }
        fn current_hp(&self) -> f64 {
            self.hp
        }
        fn set_current_hp(&mut self, hp: f64) {
            self.hp = hp;
        }
        fn current_mp(&self) -> f64 {
            self.mp
        }
        fn set_current_mp(&mut self, mp: f64) {
            self.mp = mp;
        }
        fn active_effects(&self) -> &[ActiveEffect] {
            &self.effects
        }
        fn active_effects_mut(&mut self) -> &mut Vec<ActiveEffect> {
            &mut self.effects
        }
        fn weapon_affix(&self) -> Option<Affix> {
            self.affix
        }
    }

    fn flat_stats(attack: f64, defense: f64) -> DerivedStats {
        DerivedStats {
            max_hp: 1000.0,
            max_mp: 100.0,
            physical_attack: attack,
            magical_attack: attack,
            defense,
            ..Default::default()
        }
    }

    /// Draws near the top of every range: hit rolls fail
    fn high_rng() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    /// Draws at the bottom of every range: hit and crit rolls pass
    fn low_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn guaranteed_hit_still_misses_on_a_draw_above_the_clamp() {
        // ACC - EVA >= 45 clamps the chance to 95; a draw above 95 must miss
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        attacker.stats.accuracy = 95.0;
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut high_rng());
        assert!(result.miss);
        assert_eq!(result.damage, 0.0);
        assert_eq!(defender.hp, 1000.0);
    }

    #[test]
    fn hit_chance_clamps_to_floor_on_hopeless_accuracy() {
        // Even at EVA - ACC >> 40 the chance floors at 10; a low draw hits
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Mirage", 5, flat_stats(10.0, 0.0));
        defender.stats.evasion = 80.0;
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert!(!result.miss);
        assert!(result.damage > 0.0);
    }

    #[test]
    fn crit_multiplies_damage_by_one_and_a_half() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));

        // No crit: crit_rate 0, low draws still hit
        let plain = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert!(!plain.crit);
        assert_eq!(plain.damage, 100.0);

        // Guaranteed crit
        attacker.stats.crit_rate = 100.0;
        let crit = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert!(crit.crit);
        assert_eq!(crit.damage, 150.0);
    }

    #[test]
    fn magical_basis_swings_with_magical_attack() {
        let mut stats = flat_stats(0.0, 0.0);
        stats.magical_attack = 80.0;
        let mut attacker = Dummy::new("Array Mage", 5, stats);
        attacker.basis = AttackBasis::Magical;
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert_eq!(result.damage, 80.0);
    }

    #[test]
    fn defense_mitigates_against_attacker_level() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Turtle", 5, flat_stats(10.0, 100.0));
        // reduction = 100 / (100 + 5 * 20) = 0.5
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert_eq!(result.damage, 50.0);
    }

    #[test]
    fn penetration_shrinks_effective_defense() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        attacker.stats.penetration = 50.0;
        let mut defender = Dummy::new("Turtle", 5, flat_stats(10.0, 100.0));
        // effective defense 50, reduction = 50 / 150, damage = floor(100 * 2/3)
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert_eq!(result.damage, 66.0);
    }

    #[test]
    fn mitigated_damage_never_drops_below_one() {
        let mut attacker = Dummy::new("Gnat", 1, flat_stats(1.0, 0.0));
        let mut defender = Dummy::new("Fortress", 1, flat_stats(0.0, 100_000.0));
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert_eq!(result.damage, 1.0);
    }

    #[test]
    fn affix_and_stat_lifesteal_sum() {
        let mut attacker = Dummy::new("Leech", 5, flat_stats(100.0, 0.0));
        attacker.stats.lifesteal = 5.0;
        attacker.affix = Some(Affix::Lifesteal);
        attacker.hp = 500.0;
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));

        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        // 5% stat + 5% affix = 10% of 100 damage
        assert_eq!(result.lifesteal, 10.0);
        assert_eq!(attacker.hp, 510.0);
    }

    #[test]
    fn echo_affix_appends_twenty_percent() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        attacker.affix = Some(Affix::Echo);
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert_eq!(result.damage, 100.0);
        assert_eq!(result.echo_damage, 20.0);
        assert_eq!(defender.hp, 1000.0 - 120.0);
    }

    #[test]
    fn passive_skills_cannot_be_activated() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let passive = Skill::new("gale_step", "Gale Step", crate::skill::SkillKind::Passive);
        let err =
            use_skill_with_rng(&mut attacker, &mut defender, &passive, &mut low_rng()).unwrap_err();
        assert!(matches!(err, CombatError::NotActivatable { .. }));
    }

    #[test]
    fn insufficient_mp_is_a_typed_failure() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        attacker.mp = 3.0;
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let skill = Skill::new("slash", "Crescent Slash", crate::skill::SkillKind::Active)
            .with_mp_cost(8.0)
            .with_effect(crate::skill::SkillEffect::damage(1.5, "arc"));
        let err =
            use_skill_with_rng(&mut attacker, &mut defender, &skill, &mut low_rng()).unwrap_err();
        assert!(matches!(err, CombatError::InsufficientMp { .. }));
        // No partial mutation
        assert_eq!(attacker.mp, 3.0);
        assert_eq!(defender.hp, 1000.0);
    }

    #[test]
    fn skill_damage_scales_by_power_multiplier() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let skill = Skill::new("slash", "Crescent Slash", crate::skill::SkillKind::Active)
            .with_effect(crate::skill::SkillEffect::damage(1.5, "arc"));
        let result =
            use_skill_with_rng(&mut attacker, &mut defender, &skill, &mut low_rng()).unwrap();
        assert_eq!(result.damage, 150.0);
    }

    #[test]
    fn failed_trigger_skips_only_that_effect() {
        let mut attacker = Dummy::new("Mage", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        // First effect always triggers (no chance), second never (0%)
        let skill = Skill::new("flame_array", "Flame Array", crate::skill::SkillKind::Active)
            .with_effect(crate::skill::SkillEffect::damage(1.0, "sigil"))
            .with_effect(crate::skill::SkillEffect::dot(0.4, 2, "flames").with_chance(0.0));
        // A 0% chance can never pass the trigger roll; the dot is always
        // skipped while the damage effect still resolves on its own
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let result = use_skill_with_rng(&mut attacker, &mut defender, &skill, &mut rng).unwrap();
        assert!(result.effects_applied.is_empty());
        assert!(defender.effects.is_empty());
        assert!(result
            .messages
            .iter()
            .any(|line| line.contains("fails to trigger")));
    }

    #[test]
    fn heal_is_negative_damage_on_the_result() {
        let mut attacker = Dummy::new("Healer", 5, flat_stats(50.0, 0.0));
        attacker.hp = 400.0;
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let skill = Skill::new("infusion", "Vitality Infusion", crate::skill::SkillKind::Active)
            .with_effect(crate::skill::SkillEffect::heal(1.2, 15.0, "infusion"));
        let result =
            use_skill_with_rng(&mut attacker, &mut defender, &skill, &mut low_rng()).unwrap();
        // floor(50 * 1.2 + 15) = 75
        assert!(result.is_heal());
        assert_eq!(result.damage, -75.0);
        assert_eq!(attacker.hp, 475.0);
    }

    #[test]
    fn buffs_and_stuns_become_active_effects_on_their_targets() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let skill = Skill::new("war_roar", "War Roar", crate::skill::SkillKind::Active)
            .with_effect(crate::skill::SkillEffect::buff(
                StatKind::PhysicalAttack,
                20.0,
                true,
                3,
                "roar",
            ))
            .with_effect(crate::skill::SkillEffect::stun(1, 100.0, "shock"));
        let result =
            use_skill_with_rng(&mut attacker, &mut defender, &skill, &mut low_rng()).unwrap();
        assert_eq!(result.effects_applied.len(), 2);
        assert_eq!(attacker.effects.len(), 1);
        assert_eq!(defender.effects.len(), 1);
        assert!(defender.is_stunned());
    }

    #[test]
    fn active_buff_raises_the_swing() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        attacker.effects.push(ActiveEffect::new(
            crate::skill::SkillEffect::buff(StatKind::PhysicalAttack, 20.0, true, 3, "roar"),
            0.0,
            "Shen",
        ));
        let result = perform_attack_with_rng(&mut attacker, &mut defender, &mut low_rng());
        assert_eq!(result.damage, 120.0);
    }

    #[test]
    fn dot_ticks_apply_resolved_magnitude_and_expire() {
        let mut attacker = Dummy::new("Mage", 5, flat_stats(100.0, 0.0));
        let mut defender = Dummy::new("Husk", 5, flat_stats(10.0, 0.0));
        let skill = Skill::new("flame_array", "Flame Array", crate::skill::SkillKind::Active)
            .with_effect(crate::skill::SkillEffect::dot(0.4, 2, "lingering flames"));
        use_skill_with_rng(&mut attacker, &mut defender, &skill, &mut low_rng()).unwrap();
        assert_eq!(defender.effects.len(), 1);
        assert_eq!(defender.effects[0].magnitude, 40.0);

        let first = tick_active_effects(&mut defender);
        assert_eq!(first.damage, 40.0);
        assert!(first.expired.is_empty());

        let second = tick_active_effects(&mut defender);
        assert_eq!(second.damage, 40.0);
        assert_eq!(second.expired.len(), 1);
        assert!(defender.effects.is_empty());
        assert_eq!(defender.hp, 1000.0 - 80.0);
    }

    #[test]
    fn skill_pen_bonus_applies_before_the_cap() {
        let mut attacker = Dummy::new("Shen", 5, flat_stats(100.0, 0.0));
        attacker.stats.penetration = 75.0;
        let mut defender = Dummy::new("Turtle", 5, flat_stats(10.0, 100.0));
        let skill = Skill::new("drill", "Meridian Drill", crate::skill::SkillKind::Active)
            .with_effect(crate::skill::SkillEffect::damage(1.0, "drill").with_pen_bonus(50.0));
        let result =
            use_skill_with_rng(&mut attacker, &mut defender, &skill, &mut low_rng()).unwrap();
        // 75 + 50 caps at 80: effective defense 20, reduction = 20/120
        assert_eq!(result.damage, (100.0f64 * (1.0 - 20.0 / 120.0)).floor());
    }
}
