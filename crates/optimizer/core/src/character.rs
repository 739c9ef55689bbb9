//! Characters and their optimizer-relevant state.
//!
//! The core never fetches or edits characters; it receives them inside an
//! immutable [`crate::snapshot::ProfileSnapshot`] and reads base stats and
//! per-character optimizer settings from here.

use core::fmt;

use crate::stats::{CharStatKind, StatSummary};

/// Identity of a character in the player's roster.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CharacterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A character's raw in-game stats, as reported by the game-data service.
///
/// Health, protection, speed, damage, armor, and resistance are raw values;
/// crit damage, potency, tenacity, crit chance, accuracy, and crit avoidance
/// are already percentages. Armor and resistance here are the *raw defense*
/// values the game derives the displayed percentage from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    pub level: u8,
    pub health: f64,
    pub protection: f64,
    pub speed: f64,
    pub crit_dmg: f64,
    pub potency: f64,
    pub tenacity: f64,
    pub phys_dmg: f64,
    pub spec_dmg: f64,
    /// Physical and special crit chance are modded identically; the snapshot
    /// carries them pre-merged.
    pub crit_chance: f64,
    pub armor: f64,
    pub resistance: f64,
    pub accuracy: f64,
    pub crit_avoid: f64,
}

impl CharacterStats {
    /// The displayed percentage for a raw defense value at this character's
    /// level: `100 * raw / (level * 7.5 + raw)`.
    ///
    /// The conversion depends on the character's level, so it is recomputed
    /// per character and never cached across the roster.
    pub fn defense_percent(&self, raw: f64) -> f64 {
        if raw <= 0.0 {
            return 0.0;
        }
        100.0 * raw / (f64::from(self.level) * 7.5 + raw)
    }

    /// The character's base value for a stat, in the units summaries use
    /// (armor and resistance as percentages).
    pub fn base_value(&self, kind: CharStatKind) -> f64 {
        match kind {
            CharStatKind::Health => self.health,
            CharStatKind::Protection => self.protection,
            CharStatKind::Speed => self.speed,
            CharStatKind::CritDmg => self.crit_dmg,
            CharStatKind::Potency => self.potency,
            CharStatKind::Tenacity => self.tenacity,
            CharStatKind::PhysDmg => self.phys_dmg,
            CharStatKind::SpecDmg => self.spec_dmg,
            CharStatKind::CritChance => self.crit_chance,
            CharStatKind::Armor => self.defense_percent(self.armor),
            CharStatKind::Resistance => self.defense_percent(self.resistance),
            CharStatKind::Accuracy => self.accuracy,
            CharStatKind::CritAvoid => self.crit_avoid,
        }
    }

    /// All base values as a summary (used to resolve relative target stats).
    pub fn base_summary(&self) -> StatSummary {
        CharStatKind::all()
            .into_iter()
            .map(|kind| (kind, self.base_value(kind)))
            .collect()
    }
}

/// Per-character optimizer settings, authored in the host UI.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerSettings {
    /// Candidate mods below this pip count are excluded entirely.
    pub minimum_mod_dots: u8,

    /// Whether 5-pip level-15 mods are sliced to 6 pips during projection.
    pub slice_mods: bool,

    /// Locked characters keep their current mods and are skipped by runs.
    pub locked: bool,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            minimum_mod_dots: 1,
            slice_mods: false,
            locked: false,
        }
    }
}

/// A roster character as seen by the optimizer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: CharacterId,

    /// Base/equipped stats; `None` when the game-data service has not
    /// reported them yet. A selected, non-locked character without stats
    /// rejects the whole run.
    pub stats: Option<CharacterStats>,

    pub settings: OptimizerSettings,
}

impl Character {
    pub fn new(id: impl Into<CharacterId>, stats: CharacterStats) -> Self {
        Self {
            id: id.into(),
            stats: Some(stats),
            settings: OptimizerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: OptimizerSettings) -> Self {
        self.settings = settings;
        self
    }
}
