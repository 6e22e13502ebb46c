//! Content-service port for skills and techniques, with deterministic fallbacks
//!
//! Every call site follows the same posture: ask the service, and on any
//! error log it and use the local fallback. A service outage never blocks a
//! level-up, a breakthrough or a tome drop.

use anyhow::Result;
use async_trait::async_trait;
use loot_core::StatKind;
use stat_core::realm::REALMS;
use stat_core::{AttackBasis, Skill, SkillEffect, SkillKind, Technique, TechniqueKind};

/// Outbound port to the external content-generation service
#[async_trait]
pub trait GrowthContentPort: Send + Sync {
    /// Generate a skill fitting the class and progression point.
    /// `realm_skill` marks a breakthrough reward (expected to be passive).
    async fn generate_skill(
        &self,
        class_name: &str,
        level: u32,
        realm_index: usize,
        basis: AttackBasis,
        realm_skill: bool,
    ) -> Result<Skill>;

    /// Generate a cultivation technique for the character
    async fn generate_technique(
        &self,
        character_name: &str,
        level: u32,
        realm_index: usize,
    ) -> Result<Technique>;
}

/// Port implementation for running without a content service.
///
/// Every request fails, which exercises the deterministic fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGrowth;

#[async_trait]
impl GrowthContentPort for OfflineGrowth {
    async fn generate_skill(
        &self,
        _class_name: &str,
        _level: u32,
        _realm_index: usize,
        _basis: AttackBasis,
        _realm_skill: bool,
    ) -> Result<Skill> {
        anyhow::bail!("content service offline")
    }

    async fn generate_technique(
        &self,
        _character_name: &str,
        _level: u32,
        _realm_index: usize,
    ) -> Result<Technique> {
        anyhow::bail!("content service offline")
    }
}

/// Deterministic fallback for a generated active skill.
///
/// Id is derived from the inputs so repeated fallbacks at the same
/// progression point stay idempotent.
pub fn fallback_skill(level: u32, basis: AttackBasis) -> Skill {
    let (id, name) = match basis {
        AttackBasis::Physical => (format!("surging_strike_{}", level), "Surging Strike"),
        AttackBasis::Magical => (format!("spirit_bolt_{}", level), "Spirit Bolt"),
    };
    Skill::new(id, name, SkillKind::Active)
        .with_required_level(level)
        .with_mp_cost(6.0 + level as f64 * 0.5)
        .with_effect(SkillEffect::damage(
            1.2 + level as f64 * 0.01,
            "A practiced form, honed by repetition",
        ))
}

/// Deterministic fallback for a realm-breakthrough skill.
///
/// A passive marker with no effects: the breakthrough is recorded even when
/// the service cannot dress it up.
pub fn fallback_realm_skill(realm_index: usize) -> Skill {
    let realm = REALMS
        .get(realm_index)
        .unwrap_or(&REALMS[REALMS.len() - 1]);
    let mut skill = Skill::new(
        format!("realm_insight_{}", realm_index),
        format!("{} Insight", realm.name),
        SkillKind::Passive,
    );
    skill.realm_skill = true;
    skill.required_realm = Some(realm_index);
    skill
}

/// Deterministic fallback for a generated cultivation technique
pub fn fallback_technique(level: u32) -> Technique {
    Technique::new(
        format!("breath_alignment_{}", level),
        "Breath Alignment",
        TechniqueKind::Body,
    )
    .with_bonus(StatKind::Constitution, (1 + level / 10) as f64, false)
    .with_bonus(StatKind::MaxMp, 10.0, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_skill_is_deterministic() {
        let a = fallback_skill(15, AttackBasis::Magical);
        let b = fallback_skill(15, AttackBasis::Magical);
        assert_eq!(a, b);
        assert_eq!(a.id, "spirit_bolt_15");
    }

    #[test]
    fn fallback_realm_skill_is_a_passive_marker() {
        let skill = fallback_realm_skill(2);
        assert!(skill.is_passive());
        assert!(skill.realm_skill);
        assert!(skill.effects.is_empty());
        assert_eq!(skill.required_realm, Some(2));
    }

    #[test]
    fn fallback_realm_skill_clamps_out_of_range_indices() {
        let skill = fallback_realm_skill(99);
        assert!(skill.name.contains("Dao Seeking"));
    }

    #[tokio::test]
    async fn offline_port_always_fails() {
        let port = OfflineGrowth;
        assert!(port
            .generate_skill("Blade Disciple", 10, 1, AttackBasis::Physical, false)
            .await
            .is_err());
        assert!(port.generate_technique("Shen", 10, 1).await.is_err());
    }
}
