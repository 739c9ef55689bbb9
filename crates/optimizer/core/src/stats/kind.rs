//! Closed stat vocabularies.
//!
//! Everything that used to be a dynamically-injected per-stat accessor in the
//! original application is an exhaustive match over these enums, resolved at
//! compile time.

/// The 13 character stats a loadout is scored on.
///
/// Armor and resistance are expressed as percentages in summaries; their raw
/// defense values only appear inside the projection math.
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
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[repr(u8)]
pub enum CharStatKind {
    Health = 0,
    Protection = 1,
    Speed = 2,
    CritDmg = 3,
    Potency = 4,
    Tenacity = 5,
    PhysDmg = 6,
    SpecDmg = 7,
    CritChance = 8,
    Armor = 9,
    Resistance = 10,
    Accuracy = 11,
    CritAvoid = 12,
}

impl CharStatKind {
    /// Total number of character stats.
    pub const COUNT: usize = 13;

    /// Returns all stat kinds in canonical order.
    pub const fn all() -> [CharStatKind; Self::COUNT] {
        [
            CharStatKind::Health,
            CharStatKind::Protection,
            CharStatKind::Speed,
            CharStatKind::CritDmg,
            CharStatKind::Potency,
            CharStatKind::Tenacity,
            CharStatKind::PhysDmg,
            CharStatKind::SpecDmg,
            CharStatKind::CritChance,
            CharStatKind::Armor,
            CharStatKind::Resistance,
            CharStatKind::Accuracy,
            CharStatKind::CritAvoid,
        ]
    }

    /// Returns the stat as a dense array index.
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Stat kinds a mod or set bonus can carry.
///
/// Flat kinds add their value directly to the corresponding raw character
/// stat; percent kinds multiply the character's base value. `Offense` and
/// `Defense` fan out to two character stats each (physical/special damage
/// and armor/resistance respectively).
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
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ModStatKind {
    Health,
    HealthPercent,
    Protection,
    ProtectionPercent,
    Speed,
    SpeedPercent,
    CritDmgPercent,
    CritChancePercent,
    PotencyPercent,
    TenacityPercent,
    Offense,
    OffensePercent,
    Defense,
    DefensePercent,
    AccuracyPercent,
    CritAvoidPercent,
}

impl ModStatKind {
    /// Whether the kind scales off the character's base value.
    pub const fn is_percent(self) -> bool {
        matches!(
            self,
            ModStatKind::HealthPercent
                | ModStatKind::ProtectionPercent
                | ModStatKind::SpeedPercent
                | ModStatKind::CritDmgPercent
                | ModStatKind::CritChancePercent
                | ModStatKind::PotencyPercent
                | ModStatKind::TenacityPercent
                | ModStatKind::OffensePercent
                | ModStatKind::DefensePercent
                | ModStatKind::AccuracyPercent
                | ModStatKind::CritAvoidPercent
        )
    }
}
