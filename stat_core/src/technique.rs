//! Cultivation techniques
//!
//! Every learned technique contributes its passive bonuses to stat
//! derivation, whether or not it is the character's active technique;
//! activation only gates narrative bonuses outside this engine.

use loot_core::StatKind;
use serde::{Deserialize, Serialize};

/// Technique schools; the kind decides which cap tier its bonuses feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueKind {
    /// Footwork and positioning; evasion bonuses count as skill-driven
    Movement,
    /// Offensive forms; accuracy and penetration count as skill-driven
    Attack,
    /// Body tempering
    Body,
    /// Spirit refinement
    Mind,
}

/// One passive stat bonus granted by a technique
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechniqueBonus {
    pub stat: StatKind,
    pub value: f64,
    pub percent: bool,
}

/// A learned cultivation technique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    pub id: String,
    pub name: String,
    pub kind: TechniqueKind,
    pub bonuses: Vec<TechniqueBonus>,
}

impl Technique {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: TechniqueKind) -> Self {
        Technique {
            id: id.into(),
            name: name.into(),
            kind,
            bonuses: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, stat: StatKind, value: f64, percent: bool) -> Self {
        self.bonuses.push(TechniqueBonus {
            stat,
            value,
            percent,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_bonuses() {
        let technique = Technique::new("cloud_steps", "Cloud Treading Steps", TechniqueKind::Movement)
            .with_bonus(StatKind::Evasion, 12.0, false)
            .with_bonus(StatKind::Speed, 5.0, true);
        assert_eq!(technique.bonuses.len(), 2);
        assert_eq!(technique.bonuses[0].stat, StatKind::Evasion);
    }
}
