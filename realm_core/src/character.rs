//! Characters and pets - the concrete combatants
//!
//! Both variants keep their derived stats as a cached projection: any change
//! to equipment, skills, techniques or level calls `rebuild_stats`, which
//! recomputes the projection and clamps current HP/MP to the new maxima.

use loot_core::{Affix, Item, ItemKind, SetCatalog, StatKind};
use serde::{Deserialize, Serialize};
use stat_core::{
    derive_stats, ActiveEffect, AttackBasis, BaseStats, CharacterClass, Combatant, DeriveInput,
    DerivedStats, Skill, SupportUnit, Technique,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("{0} cannot be equipped")]
    NotEquippable(ItemKind),
    #[error("no unspent stat points")]
    NoUnspentPoints,
    #[error("stat points can only be allocated to core attributes, not {0}")]
    NotACoreAttribute(StatKind),
    #[error("only custom classes allocate stat points")]
    NotCustomClass,
    #[error("{0} does not grant anything on consumption")]
    NotConsumable(ItemKind),
}

/// A player character or NPC cultivator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub exp: u64,
    pub class: CharacterClass,
    /// Points spent through explicit allocation (custom classes)
    pub allocation: BaseStats,
    pub unspent_points: u32,
    pub skills: Vec<Skill>,
    pub techniques: Vec<Technique>,
    /// Gates narrative bonuses elsewhere; derivation ignores it because all
    /// learned techniques contribute passively
    pub active_technique: Option<String>,
    /// One item per equipment slot
    equipment: HashMap<ItemKind, Item>,
    pub support_units: Vec<SupportUnit>,
    set_catalog: SetCatalog,
    stats: DerivedStats,
    pub current_hp: f64,
    pub current_mp: f64,
    pub active_effects: Vec<ActiveEffect>,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>, class: CharacterClass) -> Self {
        let mut character = Character {
            id: id.into(),
            name: name.into(),
            level: 1,
            exp: 0,
            class,
            allocation: BaseStats::default(),
            unspent_points: 0,
            skills: Vec::new(),
            techniques: Vec::new(),
            active_technique: None,
            equipment: HashMap::new(),
            support_units: Vec::new(),
            set_catalog: SetCatalog::with_defaults(),
            stats: DerivedStats::default(),
            current_hp: 0.0,
            current_mp: 0.0,
            active_effects: Vec::new(),
        };
        character.rebuild_stats();
        character.current_hp = character.stats.max_hp;
        character.current_mp = character.stats.max_mp;
        character
    }

    /// Swap in a different set catalog and recompute
    pub fn with_set_catalog(mut self, catalog: SetCatalog) -> Self {
        self.set_catalog = catalog;
        self.rebuild_stats();
        self
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    /// Recompute the derived projection and clamp current HP/MP to the new
    /// maxima. Never restores; level-up restoration is progression's call.
    pub fn rebuild_stats(&mut self) {
        let equipment: Vec<&Item> = self.equipment.values().collect();
        let input = DeriveInput::new(self.level, &self.class)
            .with_allocation(&self.allocation)
            .with_equipment(&equipment)
            .with_skills(&self.skills)
            .with_techniques(&self.techniques)
            .with_support_units(&self.support_units)
            .with_set_catalog(&self.set_catalog);
        self.stats = derive_stats(&input);
        self.current_hp = self.current_hp.min(self.stats.max_hp);
        self.current_mp = self.current_mp.min(self.stats.max_mp);
    }

    /// Equip an item into its slot, returning whatever was there before
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, CharacterError> {
        if !item.kind.is_equipment() {
            return Err(CharacterError::NotEquippable(item.kind));
        }
        let previous = self.equipment.insert(item.kind, item);
        self.rebuild_stats();
        Ok(previous)
    }

    pub fn unequip(&mut self, kind: ItemKind) -> Option<Item> {
        let item = self.equipment.remove(&kind);
        if item.is_some() {
            self.rebuild_stats();
        }
        item
    }

    pub fn equipped(&self, kind: ItemKind) -> Option<&Item> {
        self.equipment.get(&kind)
    }

    pub fn all_equipped(&self) -> impl Iterator<Item = &Item> {
        self.equipment.values()
    }

    /// Learn a skill; returns false if the id is already known (idempotent)
    pub fn learn_skill(&mut self, skill: Skill) -> bool {
        if self.skills.iter().any(|known| known.id == skill.id) {
            return false;
        }
        self.skills.push(skill);
        self.rebuild_stats();
        true
    }

    /// Learn a technique; returns false if the id is already known
    pub fn learn_technique(&mut self, technique: Technique) -> bool {
        if self.techniques.iter().any(|known| known.id == technique.id) {
            return false;
        }
        self.techniques.push(technique);
        self.rebuild_stats();
        true
    }

    /// Spend one unspent point on a core attribute (custom classes only)
    pub fn allocate_point(&mut self, stat: StatKind) -> Result<(), CharacterError> {
        if !self.class.is_custom() {
            return Err(CharacterError::NotCustomClass);
        }
        if self.unspent_points == 0 {
            return Err(CharacterError::NoUnspentPoints);
        }
        if !self.allocation.add_stat(stat, 1) {
            return Err(CharacterError::NotACoreAttribute(stat));
        }
        self.unspent_points -= 1;
        self.rebuild_stats();
        Ok(())
    }

    /// Restore HP and MP to the derived maxima
    pub fn restore_full(&mut self) {
        self.current_hp = self.stats.max_hp;
        self.current_mp = self.stats.max_mp;
    }
}

impl Combatant for Character {
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
        self.class.basis()
    }
    fn stats(&self) -> &DerivedStats {
        &self.stats
    }
    fn current_hp(&self) -> f64 {
        self.current_hp
    }
    fn set_current_hp(&mut self, hp: f64) {
        self.current_hp = hp;
    }
    fn current_mp(&self) -> f64 {
        self.current_mp
    }
    fn set_current_mp(&mut self, mp: f64) {
        self.current_mp = mp;
    }
    fn active_effects(&self) -> &[ActiveEffect] {
        &self.active_effects
    }
    fn active_effects_mut(&mut self) -> &mut Vec<ActiveEffect> {
        &mut self.active_effects
    }
    fn weapon_affix(&self) -> Option<Affix> {
        self.equipment.get(&ItemKind::Weapon).and_then(|item| item.affix)
    }
}

/// A tamed beast fighting alongside its owner.
///
/// Pets accrue attribute points from their species growth on level-up and
/// derive stats through the same pipeline as characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub species: String,
    pub level: u32,
    pub exp: u64,
    /// Attribute points accrued from leveling
    pub accrued: BaseStats,
    growth: BaseStats,
    basis: AttackBasis,
    stats: DerivedStats,
    pub current_hp: f64,
    pub current_mp: f64,
    pub active_effects: Vec<ActiveEffect>,
}

impl Pet {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        species: impl Into<String>,
        growth: BaseStats,
        basis: AttackBasis,
    ) -> Self {
        let mut pet = Pet {
            id: id.into(),
            name: name.into(),
            species: species.into(),
            level: 1,
            exp: 0,
            accrued: BaseStats::default(),
            growth,
            basis,
            stats: DerivedStats::default(),
            current_hp: 0.0,
            current_mp: 0.0,
            active_effects: Vec::new(),
        };
        pet.rebuild_stats();
        pet.current_hp = pet.stats.max_hp;
        pet.current_mp = pet.stats.max_mp;
        pet
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    pub fn growth(&self) -> &BaseStats {
        &self.growth
    }

    pub fn rebuild_stats(&mut self) {
        // Pets have no class of their own; a zero-growth custom class plus
        // the accrued points reuses the shared pipeline
        let class = CharacterClass::custom(self.species.clone(), BaseStats::default(), self.basis);
        let input = DeriveInput::new(self.level, &class).with_allocation(&self.accrued);
        self.stats = derive_stats(&input);
        self.current_hp = self.current_hp.min(self.stats.max_hp);
        self.current_mp = self.current_mp.min(self.stats.max_mp);
    }

    pub fn restore_full(&mut self) {
        self.current_hp = self.stats.max_hp;
        self.current_mp = self.stats.max_mp;
    }
}

impl Combatant for Pet {
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
        self.current_hp
    }
    fn set_current_hp(&mut self, hp: f64) {
        self.current_hp = hp;
    }
    fn current_mp(&self) -> f64 {
        self.current_mp
    }
    fn set_current_mp(&mut self, mp: f64) {
        self.current_mp = mp;
    }
    fn active_effects(&self) -> &[ActiveEffect] {
        &self.active_effects
    }
    fn active_effects_mut(&mut self) -> &mut Vec<ActiveEffect> {
        &mut self.active_effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loot_core::Rarity;
    use stat_core::class::blade_disciple;

    fn custom_class() -> CharacterClass {
        CharacterClass::custom(
            "Sword Saint",
            BaseStats {
                strength: 3,
                agility: 2,
                ..Default::default()
            },
            AttackBasis::Physical,
        )
    }

    #[test]
    fn new_character_starts_at_full_resources() {
        let character = Character::new("c1", "Shen", blade_disciple());
        assert_eq!(character.current_hp, character.stats().max_hp);
        assert_eq!(character.current_mp, character.stats().max_mp);
        assert!(character.is_alive());
    }

    #[test]
    fn equipping_refreshes_the_projection() {
        let mut character = Character::new("c1", "Shen", blade_disciple());
        let before = character.stats().physical_attack;
        let mut weapon = Item::new(1, ItemKind::Weapon, Rarity::Rare, 10);
        weapon.base_stats.insert(StatKind::PhysicalAttack, 30.0);
        character.equip(weapon).unwrap();
        assert!(character.stats().physical_attack > before);
        let removed = character.unequip(ItemKind::Weapon).unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(character.stats().physical_attack, before);
    }

    #[test]
    fn rebuild_clamps_but_never_restores() {
        let mut character = Character::new("c1", "Shen", blade_disciple());
        let mut armor = Item::new(2, ItemKind::Armor, Rarity::Epic, 10);
        armor.base_stats.insert(StatKind::MaxHp, 200.0);
        character.equip(armor).unwrap();
        let full = character.stats().max_hp;
        assert!(character.current_hp < full);

        // Dropping the armor shrinks max HP under current; current clamps
        character.current_hp = full;
        character.unequip(ItemKind::Armor);
        assert_eq!(character.current_hp, character.stats().max_hp);
    }

    #[test]
    fn tomes_cannot_be_equipped() {
        let mut character = Character::new("c1", "Shen", blade_disciple());
        let tome = Item::new(3, ItemKind::SkillTome, Rarity::Rare, 5);
        assert!(matches!(
            character.equip(tome),
            Err(CharacterError::NotEquippable(ItemKind::SkillTome))
        ));
    }

    #[test]
    fn skill_learning_is_idempotent_by_id() {
        let mut character = Character::new("c1", "Shen", blade_disciple());
        let skill = stat_core::Skill::new("slash", "Slash", stat_core::SkillKind::Active);
        assert!(character.learn_skill(skill.clone()));
        assert!(!character.learn_skill(skill));
        assert_eq!(character.skills.len(), 1);
    }

    #[test]
    fn point_allocation_is_gated_to_custom_classes() {
        let mut standard = Character::new("c1", "Shen", blade_disciple());
        assert!(matches!(
            standard.allocate_point(StatKind::Strength),
            Err(CharacterError::NotCustomClass)
        ));

        let mut custom = Character::new("c2", "Wu", custom_class());
        assert!(matches!(
            custom.allocate_point(StatKind::Strength),
            Err(CharacterError::NoUnspentPoints)
        ));

        custom.unspent_points = 2;
        let before = custom.stats().physical_attack;
        custom.allocate_point(StatKind::Strength).unwrap();
        assert!(matches!(
            custom.allocate_point(StatKind::MaxHp),
            Err(CharacterError::NotACoreAttribute(StatKind::MaxHp))
        ));
        assert_eq!(custom.unspent_points, 1);
        assert!(custom.stats().physical_attack > before);
    }

    #[test]
    fn weapon_affix_surfaces_through_the_combatant_view() {
        let mut character = Character::new("c1", "Shen", blade_disciple());
        assert_eq!(character.weapon_affix(), None);
        let mut weapon = Item::new(1, ItemKind::Weapon, Rarity::Rare, 10);
        weapon.affix = Some(Affix::Lifesteal);
        character.equip(weapon).unwrap();
        assert_eq!(character.weapon_affix(), Some(Affix::Lifesteal));
    }

    #[test]
    fn pets_derive_through_the_same_pipeline() {
        let pet = Pet::new(
            "p1",
            "Ember",
            "Flame Fox",
            BaseStats {
                agility: 2,
                intellect: 1,
                ..Default::default()
            },
            AttackBasis::Magical,
        );
        // Level 1, no accrual yet: the reference numbers hold for pets too
        assert_eq!(pet.stats().max_hp, 155.0);
        assert_eq!(pet.stats().max_mp, 102.0);
        assert_eq!(pet.attack_basis(), AttackBasis::Magical);
    }
}
