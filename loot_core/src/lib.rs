//! loot_core - Item generation and equipment economy
//!
//! This library provides:
//! - Item: the equipment data model with rarity, stats, affixes and sets
//! - Generator: procedural item creation with async content enrichment
//! - Forge operations: upgrade, evolution, dismantle, enchant
//! - SetCatalog: set membership and active set-bonus aggregation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loot_core::{GenerateRequest, Generator, SetCatalog};
//!
//! let generator = Generator::new(SetCatalog::with_defaults());
//! let item = generator.roll(&GenerateRequest::at_level(12));
//! println!("{}", item);
//!
//! let mut wallet = loot_core::MaterialWallet::new();
//! wallet.add(loot_core::MaterialKind::SpiritDust, 10);
//! let mut item = item;
//! let outcome = loot_core::upgrade(&mut item, &mut wallet, &Default::default())?;
//! println!("upgrade to +{} ({})", outcome.new_level, outcome.success);
//! ```

pub mod content;
pub mod forge;
pub mod generator;
pub mod item;
pub mod sets;
pub mod types;

// Core API - what most users need
pub use generator::{GenerateRequest, Generator};
pub use item::Item;
pub use sets::{ItemSet, SetBonus, SetCatalog, SetTier};
pub use types::{Affix, ItemKind, MaterialKind, Rarity, SoulEffect, StatKind};

// Equipment economy
pub use forge::{
    dismantle, dismantle_with_rng, enchant, success_chance, upgrade, upgrade_cost,
    upgrade_with_rng, DismantleYield, EvolutionBranch, ForgeError, MaterialWallet,
    UpgradeOptions, UpgradeOutcome,
};

// Content-service port
pub use content::{ItemContentPort, ItemFlavor, OfflineContent};
