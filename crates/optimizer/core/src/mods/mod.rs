//! Mod entity and its transformations.
//!
//! A [`Mod`] is an immutable value type. Every transformation (`equip`,
//! `unequip`, `level_up`, `slice`) returns a new value, so mods can be
//! shared freely across the sequential search without defensive copies.
//! A mod has exactly one owner at any instant: either unassigned or one
//! character.

mod primary;
mod secondary;
pub mod scoring;

pub use primary::PrimaryStat;
pub use secondary::SecondaryStat;

use core::fmt;

use arrayvec::ArrayVec;

use crate::character::CharacterId;
use crate::stats::ModStatKind;

/// Identity of a mod in the shared pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModId(pub String);

impl ModId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ModId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The six equipment positions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum ModSlot {
    Square = 0,
    Arrow = 1,
    Diamond = 2,
    Triangle = 3,
    Circle = 4,
    Cross = 5,
}

impl ModSlot {
    /// Number of slots per character.
    pub const COUNT: usize = 6;

    /// All slots in canonical order.
    pub const fn all() -> [ModSlot; Self::COUNT] {
        [
            ModSlot::Square,
            ModSlot::Arrow,
            ModSlot::Diamond,
            ModSlot::Triangle,
            ModSlot::Circle,
            ModSlot::Cross,
        ]
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// Whether the slot's primary stat varies between mods.
    ///
    /// Square mods always carry offense percent and diamond mods always
    /// carry defense percent, so primary restrictions only apply to the
    /// other four slots.
    pub const fn has_variable_primary(self) -> bool {
        !matches!(self, ModSlot::Square | ModSlot::Diamond)
    }
}

/// The eight set families.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum ModSet {
    Health = 0,
    Defense = 1,
    CritDmg = 2,
    CritChance = 3,
    Tenacity = 4,
    Offense = 5,
    Potency = 6,
    Speed = 7,
}

impl ModSet {
    /// Number of set families.
    pub const COUNT: usize = 8;

    /// All sets in canonical order.
    pub const fn all() -> [ModSet; Self::COUNT] {
        [
            ModSet::Health,
            ModSet::Defense,
            ModSet::CritDmg,
            ModSet::CritChance,
            ModSet::Tenacity,
            ModSet::Offense,
            ModSet::Potency,
            ModSet::Speed,
        ]
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Mod quality grade, grey (worst) to gold (best).
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModTier {
    #[default]
    Grey,
    Green,
    Blue,
    Purple,
    Gold,
}

/// An equippable stat-boosting item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mod {
    pub id: ModId,
    pub slot: ModSlot,
    pub set: ModSet,
    /// Rarity, 1..=6.
    pub pips: u8,
    /// Level, 1..=15.
    pub level: u8,
    pub tier: ModTier,
    pub primary: PrimaryStat,
    /// 0..=4 secondary stat lines.
    pub secondaries: ArrayVec<SecondaryStat, 4>,
    /// Current owner; `None` is the unassigned sentinel.
    pub character: Option<CharacterId>,
}

impl Mod {
    pub const MAX_LEVEL: u8 = 15;
    pub const MAX_PIPS: u8 = 6;

    pub fn new(
        id: impl Into<ModId>,
        slot: ModSlot,
        set: ModSet,
        pips: u8,
        level: u8,
        tier: ModTier,
        primary: PrimaryStat,
    ) -> Self {
        Self {
            id: id.into(),
            slot,
            set,
            pips,
            level,
            tier,
            primary,
            secondaries: ArrayVec::new(),
            character: None,
        }
    }

    /// Adds a secondary stat line (builder-style).
    ///
    /// # Panics
    /// Panics if the mod already has four secondaries.
    pub fn with_secondary(mut self, secondary: SecondaryStat) -> Self {
        self.secondaries.push(secondary);
        self
    }

    /// Returns a copy owned by `character`.
    pub fn equip(&self, character: CharacterId) -> Self {
        Self {
            character: Some(character),
            ..self.clone()
        }
    }

    /// Returns an unassigned copy.
    pub fn unequip(&self) -> Self {
        Self {
            character: None,
            ..self.clone()
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= Self::MAX_LEVEL
    }

    /// Returns a copy raised to level 15, with the primary stat set from
    /// the rarity-indexed upgrade table. Secondaries are untouched.
    pub fn level_up(&self) -> Self {
        if self.is_max_level() {
            return self.clone();
        }
        Self {
            level: Self::MAX_LEVEL,
            primary: PrimaryStat::at_max_level(self.primary.kind, self.pips),
            ..self.clone()
        }
    }

    /// Whether the mod can be sliced (5 pips at level 15).
    pub fn can_slice(&self) -> bool {
        self.pips == 5 && self.is_max_level()
    }

    /// Returns a copy sliced to 6 pips, with the primary stat from the
    /// 6-pip table and every secondary raised onto the 6-pip curve.
    ///
    /// Mods that cannot be sliced are returned unchanged.
    pub fn slice(&self) -> Self {
        if !self.can_slice() {
            return self.clone();
        }
        Self {
            pips: Self::MAX_PIPS,
            primary: PrimaryStat::at_max_level(self.primary.kind, Self::MAX_PIPS),
            secondaries: self.secondaries.iter().map(SecondaryStat::sliced).collect(),
            ..self.clone()
        }
    }

    /// The mod's secondary stat line of the given kind, if present.
    pub fn secondary(&self, kind: ModStatKind) -> Option<&SecondaryStat> {
        self.secondaries.iter().find(|s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speed_arrow(id: &str) -> Mod {
        Mod::new(
            id,
            ModSlot::Arrow,
            ModSet::Speed,
            5,
            12,
            ModTier::Gold,
            PrimaryStat::new(ModStatKind::Speed, 26.3),
        )
        .with_secondary(SecondaryStat::new(ModStatKind::Health, 1000.0, 3))
    }

    #[test]
    fn transformations_return_new_values() {
        let base = speed_arrow("m1");
        let equipped = base.equip("charA".into());
        assert_eq!(base.character, None);
        assert_eq!(equipped.character, Some(CharacterId::from("charA")));
        assert_eq!(equipped.unequip().character, None);
    }

    #[test]
    fn level_up_uses_rarity_table() {
        let leveled = speed_arrow("m1").level_up();
        assert_eq!(leveled.level, Mod::MAX_LEVEL);
        assert_eq!(leveled.primary.value, 30.0);
        // Secondaries are untouched by leveling.
        assert_eq!(leveled.secondaries[0].value, 1000.0);
    }

    #[test]
    fn slice_requires_five_pips_at_fifteen() {
        let unready = speed_arrow("m1");
        assert_eq!(unready.slice(), unready);

        let sliced = unready.level_up().slice();
        assert_eq!(sliced.pips, 6);
        assert_eq!(sliced.primary.value, 32.0);
        assert!(sliced.secondaries[0].value > 1000.0);
    }

    #[test]
    fn fixed_primary_slots() {
        assert!(!ModSlot::Square.has_variable_primary());
        assert!(!ModSlot::Diamond.has_variable_primary());
        assert!(ModSlot::Arrow.has_variable_primary());
    }
}
