//! Experience, leveling and realm breakthroughs
//!
//! `gain_exp` is the synchronous state machine; `gain_exp_with_content`
//! layers the content-service rewards (realm skills, custom-class skills)
//! on top with deterministic fallbacks.

use crate::character::Character;
use crate::content::{fallback_realm_skill, fallback_skill, GrowthContentPort};
use serde::{Deserialize, Serialize};
use stat_core::realm::{realm_index, REALMS};
use tracing::warn;

/// Unallocated stat points granted per level to custom classes
pub const STAT_POINTS_PER_LEVEL: u32 = 5;
/// Custom classes request a generated skill every this many levels
pub const CUSTOM_SKILL_INTERVAL: u32 = 5;

/// Experience required to advance from `level` to the next
pub fn exp_to_next_level(level: u32) -> u64 {
    (100.0 * (level.max(1) as f64).powf(1.5)).floor() as u64
}

/// What one exp award did to a character
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub new_level: u32,
    /// New realm index when the award crossed a realm boundary
    pub realm_breakthrough: Option<usize>,
    /// Ids of predefined skills unlocked by the new level
    pub unlocked_skills: Vec<String>,
    pub stat_points_granted: u32,
    /// Levels at which a custom class earned a generated skill
    pub custom_skill_levels: Vec<u32>,
    pub messages: Vec<String>,
}

impl LevelUpReport {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Add experience and cascade level-ups.
///
/// The threshold is recomputed after each subtraction, so one large award
/// can cross several levels. Every level-up refreshes derived stats and
/// restores HP/MP to the new maxima - the one intentional exception to the
/// no-automatic-restore rule.
pub fn gain_exp(character: &mut Character, amount: u64) -> LevelUpReport {
    let mut report = LevelUpReport {
        new_level: character.level,
        ..Default::default()
    };
    let old_realm = realm_index(character.level);

    character.exp += amount;
    while character.exp >= exp_to_next_level(character.level) {
        character.exp -= exp_to_next_level(character.level);
        character.level += 1;
        report.levels_gained += 1;
        report
            .messages
            .push(format!("{} reached level {}", character.name, character.level));

        if character.class.is_custom() {
            character.unspent_points += STAT_POINTS_PER_LEVEL;
            report.stat_points_granted += STAT_POINTS_PER_LEVEL;
            if character.level % CUSTOM_SKILL_INTERVAL == 0 {
                report.custom_skill_levels.push(character.level);
            }
        }
    }

    if !report.leveled_up() {
        return report;
    }
    report.new_level = character.level;

    // Standard classes unlock any predefined skill whose requirement is now
    // met; learning is idempotent by id
    let due: Vec<_> = character
        .class
        .unlocks()
        .iter()
        .filter(|unlock| unlock.level <= character.level)
        .map(|unlock| unlock.skill.clone())
        .collect();
    for skill in due {
        let id = skill.id.clone();
        if character.learn_skill(skill) {
            report.unlocked_skills.push(id);
        }
    }

    character.rebuild_stats();
    character.restore_full();

    let new_realm = realm_index(character.level);
    if new_realm != old_realm {
        report.realm_breakthrough = Some(new_realm);
        report.messages.push(format!(
            "{} broke through to {}",
            character.name, REALMS[new_realm].name
        ));
    }
    report
}

/// `gain_exp`, plus content-service rewards with local fallbacks.
///
/// A breakthrough requests a realm skill; custom classes request a skill at
/// every interval level crossed. Service errors are logged and replaced by
/// the deterministic fallbacks - progression never blocks on the service.
pub async fn gain_exp_with_content(
    character: &mut Character,
    amount: u64,
    content: &dyn GrowthContentPort,
) -> LevelUpReport {
    let mut report = gain_exp(character, amount);

    if let Some(realm) = report.realm_breakthrough {
        let skill = match content
            .generate_skill(
                character.class.name(),
                character.level,
                realm,
                character.class.basis(),
                true,
            )
            .await
        {
            Ok(skill) => skill,
            Err(error) => {
                warn!(character = character.id.as_str(), %error, "realm skill generation failed, using fallback");
                fallback_realm_skill(realm)
            }
        };
        let id = skill.id.clone();
        if character.learn_skill(skill) {
            report.unlocked_skills.push(id);
        }
    }

    for level in report.custom_skill_levels.clone() {
        let skill = match content
            .generate_skill(
                character.class.name(),
                level,
                realm_index(level),
                character.class.basis(),
                false,
            )
            .await
        {
            Ok(skill) => skill,
            Err(error) => {
                warn!(character = character.id.as_str(), %error, "skill generation failed, using fallback");
                fallback_skill(level, character.class.basis())
            }
        };
        let id = skill.id.clone();
        if character.learn_skill(skill) {
            report.unlocked_skills.push(id);
        }
    }

    report
}

/// Add experience to a pet, cascading level-ups on the same curve.
///
/// Each level accrues the species growth into the pet's attributes, then
/// stats refresh and resources restore, mirroring character level-ups.
pub fn gain_pet_exp(pet: &mut crate::character::Pet, amount: u64) -> LevelUpReport {
    let mut report = LevelUpReport {
        new_level: pet.level,
        ..Default::default()
    };

    pet.exp += amount;
    while pet.exp >= exp_to_next_level(pet.level) {
        pet.exp -= exp_to_next_level(pet.level);
        pet.level += 1;
        report.levels_gained += 1;
        let growth = *pet.growth();
        pet.accrued.add_scaled(&growth, 1);
        report
            .messages
            .push(format!("{} reached level {}", pet.name, pet.level));
    }

    if report.leveled_up() {
        report.new_level = pet.level;
        pet.rebuild_stats();
        pet.restore_full();
    }
    report
}
