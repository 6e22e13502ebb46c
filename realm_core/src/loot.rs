//! Item generation orchestration
//!
//! Equipment comes straight from the loot generator; skill tomes and
//! technique manuals additionally carry a generated payload, minted from the
//! content service with the usual deterministic fallback. The item is always
//! valid immediately - richer content only ever patches in on top.

use crate::character::{Character, CharacterError};
use crate::content::{fallback_skill, fallback_technique, GrowthContentPort};
use loot_core::{GenerateRequest, Generator, Item, ItemContentPort, ItemKind};
use serde::{Deserialize, Serialize};
use stat_core::realm::realm_index;
use stat_core::{Skill, Technique};
use tracing::warn;

/// An item plus the skill or technique payload it grants on consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub item: Item,
    pub skill: Option<Skill>,
    pub technique: Option<Technique>,
}

impl GeneratedItem {
    pub fn equipment(item: Item) -> Self {
        GeneratedItem {
            item,
            skill: None,
            technique: None,
        }
    }
}

/// Generate an item for a character, attaching tome/manual payloads.
///
/// Never fails: content-service errors are logged and replaced by the
/// deterministic fallbacks at each step.
pub async fn generate_item_for(
    character: &Character,
    generator: &Generator,
    req: &GenerateRequest,
    item_content: &dyn ItemContentPort,
    growth_content: &dyn GrowthContentPort,
) -> GeneratedItem {
    let mut item = generator.generate(req, item_content).await;

    match item.kind {
        ItemKind::SkillTome => {
            let skill = match growth_content
                .generate_skill(
                    character.class.name(),
                    character.level,
                    realm_index(character.level),
                    character.class.basis(),
                    false,
                )
                .await
            {
                Ok(skill) => skill,
                Err(error) => {
                    warn!(character = character.id.as_str(), %error, "tome skill generation failed, using fallback");
                    fallback_skill(character.level, character.class.basis())
                }
            };
            item.grants_id = Some(skill.id.clone());
            item.name = format!("Skill Tome: {}", skill.name);
            GeneratedItem {
                item,
                skill: Some(skill),
                technique: None,
            }
        }
        ItemKind::TechniqueManual => {
            let technique = match growth_content
                .generate_technique(&character.name, character.level, realm_index(character.level))
                .await
            {
                Ok(technique) => technique,
                Err(error) => {
                    warn!(character = character.id.as_str(), %error, "manual technique generation failed, using fallback");
                    fallback_technique(character.level)
                }
            };
            item.grants_id = Some(technique.id.clone());
            item.name = format!("Technique Manual: {}", technique.name);
            GeneratedItem {
                item,
                skill: None,
                technique: Some(technique),
            }
        }
        _ => GeneratedItem::equipment(item),
    }
}

/// Consume a tome or manual, learning its payload.
///
/// Returns whether anything new was learned; re-reading a known skill or
/// technique consumes the item without effect.
pub fn learn_from_tome(
    character: &mut Character,
    generated: GeneratedItem,
) -> Result<bool, CharacterError> {
    if !generated.item.kind.is_consumable_grant() {
        return Err(CharacterError::NotConsumable(generated.item.kind));
    }
    let mut learned = false;
    if let Some(skill) = generated.skill {
        learned |= character.learn_skill(skill);
    }
    if let Some(technique) = generated.technique {
        learned |= character.learn_technique(technique);
    }
    Ok(learned)
}
