use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Item rarity tiers, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    /// Get all rarity tiers in ascending order
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
            Rarity::Mythic,
        ]
    }

    /// Tier index, 0 for Common through 5 for Mythic
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Drop weight in permille (Common 600 .. Mythic 1, sums to 1000)
    pub fn weight_permille(&self) -> u32 {
        match self {
            Rarity::Common => 600,
            Rarity::Uncommon => 250,
            Rarity::Rare => 100,
            Rarity::Epic => 40,
            Rarity::Legendary => 9,
            Rarity::Mythic => 1,
        }
    }

    /// Stat multiplier applied to generated base stats
    pub fn multiplier(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.2,
            Rarity::Rare => 1.5,
            Rarity::Epic => 2.0,
            Rarity::Legendary => 2.8,
            Rarity::Mythic => 4.0,
        }
    }

    /// Number of bonus stats rolled at generation
    pub fn bonus_rolls(&self) -> u32 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
            Rarity::Mythic => 5,
        }
    }

    /// Maximum upgrade level for items of this tier
    pub fn max_upgrade_level(&self) -> u32 {
        match self {
            Rarity::Common => 6,
            Rarity::Uncommon => 9,
            Rarity::Rare => 12,
            Rarity::Epic => 15,
            Rarity::Legendary => 18,
            Rarity::Mythic => 21,
        }
    }

    /// Roll a rarity from the cumulative drop table
    pub fn roll<R: Rng>(rng: &mut R) -> Rarity {
        let draw = rng.gen_range(0..1000u32);
        let mut cumulative = 0;
        for rarity in Rarity::all() {
            cumulative += rarity.weight_permille();
            if draw < cumulative {
                return *rarity;
            }
        }
        Rarity::Mythic
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Epic => write!(f, "Epic"),
            Rarity::Legendary => write!(f, "Legendary"),
            Rarity::Mythic => write!(f, "Mythic"),
        }
    }
}

/// Item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Ring,
    Amulet,
    SkillTome,
    TechniqueManual,
}

impl ItemKind {
    /// Kinds that occupy an equipment slot and carry stats
    pub const EQUIPMENT: &'static [ItemKind] = &[
        ItemKind::Weapon,
        ItemKind::Armor,
        ItemKind::Ring,
        ItemKind::Amulet,
    ];

    pub fn is_equipment(&self) -> bool {
        matches!(
            self,
            ItemKind::Weapon | ItemKind::Armor | ItemKind::Ring | ItemKind::Amulet
        )
    }

    /// Kinds consumed on use to grant a skill or technique
    pub fn is_consumable_grant(&self) -> bool {
        matches!(self, ItemKind::SkillTome | ItemKind::TechniqueManual)
    }

    /// Upgrade level at which a successful upgrade triggers evolution
    pub fn evolution_milestone(&self) -> Option<u32> {
        match self {
            ItemKind::Weapon | ItemKind::Armor => Some(12),
            ItemKind::Ring | ItemKind::Amulet => Some(9),
            ItemKind::SkillTome | ItemKind::TechniqueManual => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Weapon => write!(f, "Weapon"),
            ItemKind::Armor => write!(f, "Armor"),
            ItemKind::Ring => write!(f, "Ring"),
            ItemKind::Amulet => write!(f, "Amulet"),
            ItemKind::SkillTome => write!(f, "Skill Tome"),
            ItemKind::TechniqueManual => write!(f, "Technique Manual"),
        }
    }
}

/// Stat keys shared by items, set bonuses and the derivation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    // Core attributes
    Strength,
    Agility,
    Intellect,
    Spirit,
    Constitution,
    Dexterity,
    // Derived stats
    MaxHp,
    MaxMp,
    PhysicalAttack,
    MagicalAttack,
    Defense,
    Speed,
    CritRate,
    Accuracy,
    Evasion,
    Penetration,
    Lifesteal,
    ElementalDamage,
    ElementalResist,
}

impl StatKind {
    /// All stat keys, core attributes first
    pub fn all() -> &'static [StatKind] {
        &[
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
        ]
    }

    /// Whether this key is one of the six core attributes
    pub fn is_core_attribute(&self) -> bool {
        matches!(
            self,
            StatKind::Strength
                | StatKind::Agility
                | StatKind::Intellect
                | StatKind::Spirit
                | StatKind::Constitution
                | StatKind::Dexterity
        )
    }

    /// Parse a snake_case stat key, e.g. from content-service output.
    ///
    /// Returns None for unrecognized keys so callers can skip them instead
    /// of failing (forward compatibility with data-table growth).
    pub fn from_key(key: &str) -> Option<StatKind> {
        let kind = match key {
            "strength" => StatKind::Strength,
            "agility" => StatKind::Agility,
            "intellect" => StatKind::Intellect,
            "spirit" => StatKind::Spirit,
            "constitution" => StatKind::Constitution,
            "dexterity" => StatKind::Dexterity,
            "max_hp" => StatKind::MaxHp,
            "max_mp" => StatKind::MaxMp,
            "physical_attack" => StatKind::PhysicalAttack,
            "magical_attack" => StatKind::MagicalAttack,
            "defense" => StatKind::Defense,
            "speed" => StatKind::Speed,
            "crit_rate" => StatKind::CritRate,
            "accuracy" => StatKind::Accuracy,
            "evasion" => StatKind::Evasion,
            "penetration" => StatKind::Penetration,
            "lifesteal" => StatKind::Lifesteal,
            "elemental_damage" => StatKind::ElementalDamage,
            "elemental_resist" => StatKind::ElementalResist,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatKind::Strength => "Strength",
            StatKind::Agility => "Agility",
            StatKind::Intellect => "Intellect",
            StatKind::Spirit => "Spirit",
            StatKind::Constitution => "Constitution",
            StatKind::Dexterity => "Dexterity",
            StatKind::MaxHp => "Max HP",
            StatKind::MaxMp => "Max MP",
            StatKind::PhysicalAttack => "Physical Attack",
            StatKind::MagicalAttack => "Magical Attack",
            StatKind::Defense => "Defense",
            StatKind::Speed => "Speed",
            StatKind::CritRate => "Crit Rate",
            StatKind::Accuracy => "Accuracy",
            StatKind::Evasion => "Evasion",
            StatKind::Penetration => "Penetration",
            StatKind::Lifesteal => "Lifesteal",
            StatKind::ElementalDamage => "Elemental Damage",
            StatKind::ElementalResist => "Elemental Resist",
        };
        write!(f, "{}", name)
    }
}

/// Fixed named specials attachable to gear, independent of stat rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affix {
    /// Heals the wielder for a fixed percent of final damage dealt
    Lifesteal,
    /// Echoes additional flat damage after the main hit
    Echo,
    /// Adds penetration to skill damage
    Rending,
    /// Adds flat defense
    Bulwark,
}

impl Affix {
    /// Lifesteal percent contributed by the affix (stacks with stat lifesteal)
    pub fn lifesteal_percent(&self) -> f64 {
        match self {
            Affix::Lifesteal => 5.0,
            _ => 0.0,
        }
    }

    /// Percent of final damage echoed as extra flat damage
    pub fn echo_percent(&self) -> f64 {
        match self {
            Affix::Echo => 20.0,
            _ => 0.0,
        }
    }

    /// Penetration percent added before the cap
    pub fn penetration_bonus(&self) -> f64 {
        match self {
            Affix::Rending => 5.0,
            _ => 0.0,
        }
    }

    /// Flat defense granted while equipped
    pub fn defense_bonus(&self) -> f64 {
        match self {
            Affix::Bulwark => 10.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Affix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Affix::Lifesteal => write!(f, "Lifesteal"),
            Affix::Echo => write!(f, "Echo"),
            Affix::Rending => write!(f, "Rending"),
            Affix::Bulwark => write!(f, "Bulwark"),
        }
    }
}

/// Enchantment-style bonus applied post-creation, one flat or percent stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoulEffect {
    pub stat: StatKind,
    pub value: f64,
    pub percent: bool,
}

impl fmt::Display for SoulEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.percent {
            write!(f, "+{}% {}", self.value, self.stat)
        } else {
            write!(f, "+{} {}", self.value, self.stat)
        }
    }
}

/// Crafting materials yielded by dismantling and spent on upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    SpiritDust,
    SpiritEssence,
    SpiritCrystal,
    /// Rare dismantle bonus, never part of upgrade costs
    BeastSoul,
}

impl MaterialKind {
    /// Material tier yielded when dismantling an item of the given rarity
    pub fn for_rarity(rarity: Rarity) -> MaterialKind {
        match rarity {
            Rarity::Common | Rarity::Uncommon => MaterialKind::SpiritDust,
            Rarity::Rare | Rarity::Epic => MaterialKind::SpiritEssence,
            Rarity::Legendary | Rarity::Mythic => MaterialKind::SpiritCrystal,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialKind::SpiritDust => write!(f, "Spirit Dust"),
            MaterialKind::SpiritEssence => write!(f, "Spirit Essence"),
            MaterialKind::SpiritCrystal => write!(f, "Spirit Crystal"),
            MaterialKind::BeastSoul => write!(f, "Beast Soul"),
        }
    }
}
