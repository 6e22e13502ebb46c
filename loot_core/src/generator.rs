//! Procedural item generation
//!
//! Generation is split in two phases so game state never waits on the
//! content service: `roll` produces a complete, structurally valid item from
//! local tables, and `enrich` patches in service-generated flavor and
//! thematic bonus stats when (and only when) the request succeeds.

use crate::content::ItemContentPort;
use crate::item::Item;
use crate::sets::SetCatalog;
use crate::types::{ItemKind, Rarity, StatKind};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use tracing::warn;

/// Chance for a Rare+ item to be replaced by a set-catalog entry
const SET_ROLL_CHANCE: f64 = 0.20;

/// Parameters for one generation request
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateRequest {
    pub item_level: u32,
    /// Skip the rarity roll and force a tier
    pub rarity: Option<Rarity>,
    /// Skip the kind roll and force a kind
    pub kind: Option<ItemKind>,
}

impl GenerateRequest {
    pub fn at_level(item_level: u32) -> Self {
        GenerateRequest {
            item_level,
            ..Default::default()
        }
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Item generator backed by the fixed rarity tables and a set catalog
#[derive(Debug, Clone, Default)]
pub struct Generator {
    catalog: SetCatalog,
}

impl Generator {
    pub fn new(catalog: SetCatalog) -> Self {
        Generator { catalog }
    }

    pub fn catalog(&self) -> &SetCatalog {
        &self.catalog
    }

    /// Roll a complete item from local tables (RNG handled internally)
    pub fn roll(&self, req: &GenerateRequest) -> Item {
        let mut rng = rand::thread_rng();
        self.roll_with_rng(req, &mut rng)
    }

    /// Roll a complete item with a provided RNG (for deterministic testing)
    pub fn roll_with_rng<R: Rng>(&self, req: &GenerateRequest, rng: &mut R) -> Item {
        let rarity = req.rarity.unwrap_or_else(|| Rarity::roll(rng));
        let kind = req.kind.unwrap_or_else(|| {
            *ItemKind::EQUIPMENT
                .choose(rng)
                .expect("equipment kind table is non-empty")
        });

        let mut item = Item::new(rng.gen::<u64>(), kind, rarity, req.item_level);

        // Tomes and manuals bypass the stat pipeline entirely; their payload
        // is attached by the caller that owns skill/technique generation.
        if !kind.is_equipment() {
            return item;
        }

        // Primary stat: one candidate chosen uniformly, scaled by item level
        // and the rarity multiplier, floored.
        let stat = *base_stat_candidates(kind)
            .choose(rng)
            .expect("every equipment kind has base stat candidates");
        let value = (base_stat_value(kind, stat, req.item_level) * rarity.multiplier()).floor();
        item.base_stats.insert(stat, value.max(1.0));

        // Set replacement fixes the display name to the catalog's entry.
        if rarity >= Rarity::Rare && rng.gen_bool(SET_ROLL_CHANCE) {
            let sets = self.catalog.sets_for_kind(kind);
            if let Some(set) = sets.choose(rng) {
                if let Some(piece_name) = set.piece_name(kind) {
                    item.set_id = Some(set.id.clone());
                    item.name = piece_name.to_string();
                }
            }
        }

        roll_bonus_stats(&mut item, rarity.bonus_rolls(), rng);
        item
    }

    /// Roll an item, then patch in content-service flavor and bonus stats.
    ///
    /// Never fails: each service error is logged and the deterministic roll
    /// for that step stands.
    pub async fn generate(&self, req: &GenerateRequest, content: &dyn ItemContentPort) -> Item {
        let mut item = self.roll(req);
        self.enrich(&mut item, content).await;
        item
    }

    /// Patch service-generated content onto an already rolled item.
    ///
    /// Common and Uncommon items keep their generic name; set pieces keep
    /// their designated name.
    pub async fn enrich(&self, item: &mut Item, content: &dyn ItemContentPort) {
        if item.rarity < Rarity::Rare {
            return;
        }

        match content.generate_flavor(item).await {
            Ok(flavor) => {
                if item.set_id.is_none() && !flavor.name.trim().is_empty() {
                    item.name = flavor.name;
                }
                item.description = flavor.description;
            }
            Err(error) => {
                warn!(item_id = item.id, %error, "item flavor generation failed, keeping generic name");
            }
        }

        if !item.kind.is_equipment() {
            return;
        }

        let count = item.rarity.bonus_rolls();
        match content.generate_bonus_stats(item, count).await {
            Ok(raw) => {
                let validated = validate_bonus_stats(item, &raw, count);
                if !validated.is_empty() {
                    item.bonus_stats = validated;
                }
            }
            Err(error) => {
                warn!(item_id = item.id, %error, "bonus stat generation failed, keeping rolled stats");
            }
        }
    }
}

/// Candidate primary stats per equipment kind
fn base_stat_candidates(kind: ItemKind) -> &'static [StatKind] {
    match kind {
        ItemKind::Weapon => &[StatKind::PhysicalAttack, StatKind::MagicalAttack],
        ItemKind::Armor => &[StatKind::Defense, StatKind::MaxHp],
        ItemKind::Ring => &[
            StatKind::PhysicalAttack,
            StatKind::MagicalAttack,
            StatKind::CritRate,
        ],
        ItemKind::Amulet => &[StatKind::MaxHp, StatKind::MaxMp, StatKind::Spirit],
        ItemKind::SkillTome | ItemKind::TechniqueManual => &[],
    }
}

/// Pre-rarity base stat value for a kind/stat pair at an item level
fn base_stat_value(kind: ItemKind, stat: StatKind, level: u32) -> f64 {
    let level = level as f64;
    match (kind, stat) {
        (ItemKind::Weapon, _) => 4.0 + 2.0 * level,
        (ItemKind::Armor, StatKind::Defense) => 3.0 + 1.5 * level,
        (ItemKind::Armor, _) => 10.0 + 5.0 * level,
        (ItemKind::Ring, StatKind::CritRate) => 1.0 + 0.2 * level,
        (ItemKind::Ring, _) => 2.0 + 0.8 * level,
        (ItemKind::Amulet, StatKind::MaxHp) => 8.0 + 4.0 * level,
        (ItemKind::Amulet, StatKind::MaxMp) => 6.0 + 3.0 * level,
        (ItemKind::Amulet, _) => 1.0 + 0.5 * level,
        _ => 0.0,
    }
}

/// Stats eligible for bonus rolls
const BONUS_POOL: &[StatKind] = &[
    StatKind::Strength,
    StatKind::Agility,
    StatKind::Intellect,
    StatKind::Spirit,
    StatKind::Constitution,
    StatKind::Dexterity,
    StatKind::MaxHp,
    StatKind::MaxMp,
    StatKind::PhysicalAttack,
    StatKind::MagicalAttack,
    StatKind::Defense,
    StatKind::Speed,
    StatKind::CritRate,
    StatKind::Accuracy,
    StatKind::Evasion,
    StatKind::Penetration,
    StatKind::Lifesteal,
    StatKind::ElementalDamage,
    StatKind::ElementalResist,
];

/// Roll `count` distinct bonus stats onto the item.
///
/// Magnitude: max(1, floor((level/4 + 1) * rarity_mult * U)), U in [0.8, 1.2].
fn roll_bonus_stats<R: Rng>(item: &mut Item, count: u32, rng: &mut R) {
    let mut pool: Vec<StatKind> = BONUS_POOL.to_vec();
    pool.shuffle(rng);
    for stat in pool.into_iter().take(count as usize) {
        let magnitude = bonus_magnitude(item.level, item.rarity, rng.gen_range(0.8..=1.2));
        item.bonus_stats.insert(stat, magnitude);
    }
}

fn bonus_magnitude(level: u32, rarity: Rarity, jitter: f64) -> f64 {
    let raw = (level as f64 / 4.0 + 1.0) * rarity.multiplier() * jitter;
    raw.floor().max(1.0)
}

/// Keep only recognized keys with values inside the local roll bounds.
///
/// The service proposes stats; the engine still owns the rules.
fn validate_bonus_stats(
    item: &Item,
    raw: &HashMap<String, f64>,
    count: u32,
) -> HashMap<StatKind, f64> {
    let max_value = bonus_magnitude(item.level, item.rarity, 1.2);
    let mut keys: Vec<&String> = raw.keys().collect();
    keys.sort_unstable();

    let mut validated = HashMap::new();
    for key in keys {
        if validated.len() as u32 >= count {
            break;
        }
        let Some(stat) = StatKind::from_key(key) else {
            continue;
        };
        let value = raw[key];
        if value.is_finite() && value >= 1.0 {
            validated.insert(stat, value.min(max_value).floor());
        }
    }
    validated
}
