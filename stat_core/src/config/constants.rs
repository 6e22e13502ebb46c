//! Game constants configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use super::ConfigError;

/// Global game constants instance
static GAME_CONSTANTS: OnceLock<GameConstants> = OnceLock::new();

/// Initialize the global game constants from a TOML file
///
/// Must be called once at startup before any combat calculations.
/// Returns error if already initialized or if loading fails.
pub fn init_constants(path: &Path) -> Result<(), ConfigError> {
    let constants = GameConstants::load_from_path(path)?;
    GAME_CONSTANTS
        .set(constants)
        .map_err(|_| ConfigError::ValidationError("GameConstants already initialized".to_string()))
}

/// Initialize the global game constants with default values
///
/// Useful for tests or when no config file is available.
pub fn init_constants_default() -> Result<(), ConfigError> {
    GAME_CONSTANTS
        .set(GameConstants::default())
        .map_err(|_| ConfigError::ValidationError("GameConstants already initialized".to_string()))
}

/// Get a reference to the global game constants
///
/// Panics if constants have not been initialized via `init_constants()` or `init_constants_default()`.
pub fn constants() -> &'static GameConstants {
    GAME_CONSTANTS
        .get()
        .expect("GameConstants not initialized - call init_constants() or init_constants_default() first")
}

/// Check if constants have been initialized
pub fn constants_initialized() -> bool {
    GAME_CONSTANTS.get().is_some()
}

/// Ensure constants are initialized with defaults (idempotent, useful for tests)
///
/// If constants are already initialized, this does nothing.
/// If not initialized, initializes with default values.
pub fn ensure_constants_initialized() {
    GAME_CONSTANTS.get_or_init(GameConstants::default);
}

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub mitigation: MitigationConstants,
    #[serde(default)]
    pub caps: CapConstants,
}

impl GameConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let constants: GameConstants = toml::from_str(&content)?;
        Ok(constants)
    }
}

/// Hit-check model: chance = clamp(base + accuracy - evasion, min, max)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitConstants {
    /// Baseline for basic attacks
    #[serde(default = "default_base_chance")]
    pub base_chance: f64,
    /// Baseline for skill damage effects
    #[serde(default = "default_skill_base_chance")]
    pub skill_base_chance: f64,
    #[serde(default = "default_min_chance")]
    pub min_chance: f64,
    #[serde(default = "default_max_chance")]
    pub max_chance: f64,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            base_chance: 50.0,
            skill_base_chance: 80.0,
            min_chance: 10.0,
            max_chance: 95.0,
        }
    }
}

fn default_base_chance() -> f64 {
    50.0
}
fn default_skill_base_chance() -> f64 {
    80.0
}
fn default_min_chance() -> f64 {
    10.0
}
fn default_max_chance() -> f64 {
    95.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritConstants {
    /// Critical strike multiplier (1.5 = 150%)
    #[serde(default = "default_crit_multiplier")]
    pub multiplier: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants { multiplier: 1.5 }
    }
}

fn default_crit_multiplier() -> f64 {
    1.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitigationConstants {
    /// Formula constant: reduction = defense / (defense + constant * attacker level)
    #[serde(default = "default_level_constant")]
    pub level_constant: f64,
    /// Damage floor after mitigation
    #[serde(default = "default_minimum_damage")]
    pub minimum_damage: f64,
}

impl Default for MitigationConstants {
    fn default() -> Self {
        MitigationConstants {
            level_constant: 20.0,
            minimum_damage: 1.0,
        }
    }
}

fn default_level_constant() -> f64 {
    20.0
}
fn default_minimum_damage() -> f64 {
    1.0
}

/// Two-tier caps for evasion, accuracy and penetration.
///
/// Gear-driven and skill-driven contributions cap separately before the
/// combined total caps, so neither source alone can reach the ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapConstants {
    #[serde(default = "default_evasion_gear_cap")]
    pub evasion_gear_cap: f64,
    #[serde(default = "default_evasion_skill_cap")]
    pub evasion_skill_cap: f64,
    #[serde(default = "default_evasion_total_cap")]
    pub evasion_total_cap: f64,
    #[serde(default = "default_accuracy_gear_cap")]
    pub accuracy_gear_cap: f64,
    #[serde(default = "default_accuracy_skill_cap")]
    pub accuracy_skill_cap: f64,
    #[serde(default = "default_accuracy_total_cap")]
    pub accuracy_total_cap: f64,
    #[serde(default = "default_penetration_gear_cap")]
    pub penetration_gear_cap: f64,
    #[serde(default = "default_penetration_skill_cap")]
    pub penetration_skill_cap: f64,
    #[serde(default = "default_penetration_total_cap")]
    pub penetration_total_cap: f64,
}

impl Default for CapConstants {
    fn default() -> Self {
        CapConstants {
            evasion_gear_cap: 20.0,
            evasion_skill_cap: 60.0,
            evasion_total_cap: 80.0,
            accuracy_gear_cap: 10.0,
            accuracy_skill_cap: 85.0,
            accuracy_total_cap: 95.0,
            penetration_gear_cap: 10.0,
            penetration_skill_cap: 70.0,
            penetration_total_cap: 80.0,
        }
    }
}

fn default_evasion_gear_cap() -> f64 {
    20.0
}
fn default_evasion_skill_cap() -> f64 {
    60.0
}
fn default_evasion_total_cap() -> f64 {
    80.0
}
fn default_accuracy_gear_cap() -> f64 {
    10.0
}
fn default_accuracy_skill_cap() -> f64 {
    85.0
}
fn default_accuracy_total_cap() -> f64 {
    95.0
}
fn default_penetration_gear_cap() -> f64 {
    10.0
}
fn default_penetration_skill_cap() -> f64 {
    70.0
}
fn default_penetration_total_cap() -> f64 {
    80.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.hit.base_chance - 50.0).abs() < f64::EPSILON);
        assert!((constants.crit.multiplier - 1.5).abs() < f64::EPSILON);
        assert!((constants.caps.accuracy_total_cap - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[hit]
base_chance = 50
skill_base_chance = 80
min_chance = 10
max_chance = 95

[crit]
multiplier = 1.5

[mitigation]
level_constant = 20.0
minimum_damage = 1.0

[caps]
evasion_gear_cap = 20
evasion_skill_cap = 60
evasion_total_cap = 80
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert!((constants.hit.max_chance - 95.0).abs() < f64::EPSILON);
        // Omitted fields fall back to their defaults
        assert!((constants.caps.penetration_total_cap - 80.0).abs() < f64::EPSILON);
    }
}
