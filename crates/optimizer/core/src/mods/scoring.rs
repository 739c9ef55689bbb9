//! Named mod-scoring strategies.
//!
//! Each strategy is a pure function `Mod -> f64`, selectable by name for
//! display and filtering in the host UI. None of these feed the loadout
//! search; the search only ever consults the plan's weight vector.

use crate::stats::ModStatKind;

use super::{Mod, ModSet, ModSlot};

/// Selectable aggregate scoring strategies.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ScoreStrategy {
    /// Plain average of the secondary roll-quality scores.
    #[default]
    PureSecondaries,
    /// Roll-count-weighted average of the secondary scores.
    RollWeightedSecondaries,
    /// Fixed per-set and per-stat coefficient sum; a flat score, not a
    /// percentile.
    GimoOffense,
    /// Offense-archetype score for 6-pip candidates.
    Pure6EOffense,
    /// Defense-archetype score for 6-pip candidates.
    Pure6EDefense,
}

impl ScoreStrategy {
    /// Scores a mod under this strategy.
    pub fn score(self, mod_: &Mod) -> f64 {
        match self {
            ScoreStrategy::PureSecondaries => pure_secondaries(mod_),
            ScoreStrategy::RollWeightedSecondaries => roll_weighted_secondaries(mod_),
            ScoreStrategy::GimoOffense => gimo_offense(mod_),
            ScoreStrategy::Pure6EOffense => pure_archetype(mod_, &OFFENSE_ARCHETYPE),
            ScoreStrategy::Pure6EDefense => pure_archetype(mod_, &DEFENSE_ARCHETYPE),
        }
    }
}

/// Display letter class for a mod, bucketing [`ScoreStrategy::PureSecondaries`]
/// into quintiles. Display/filtering only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreClass {
    D,
    C,
    B,
    A,
    S,
}

impl ScoreClass {
    /// Buckets a pure-secondaries score (÷20, floored).
    pub fn of(mod_: &Mod) -> Self {
        match (pure_secondaries(mod_) / 20.0) as u8 {
            0 => ScoreClass::D,
            1 => ScoreClass::C,
            2 => ScoreClass::B,
            3 => ScoreClass::A,
            _ => ScoreClass::S,
        }
    }
}

fn pure_secondaries(mod_: &Mod) -> f64 {
    if mod_.secondaries.is_empty() {
        return 0.0;
    }
    let total: f64 = mod_.secondaries.iter().map(|s| s.score(mod_.pips)).sum();
    total / mod_.secondaries.len() as f64
}

fn roll_weighted_secondaries(mod_: &Mod) -> f64 {
    let rolls: u32 = mod_.secondaries.iter().map(|s| u32::from(s.rolls)).sum();
    if rolls == 0 {
        return 0.0;
    }
    let total: f64 = mod_
        .secondaries
        .iter()
        .map(|s| s.score(mod_.pips) * f64::from(s.rolls))
        .sum();
    total / f64::from(rolls)
}

/// Coefficient sum tuned for raw offensive output.
///
/// Speed dominates deliberately; the per-stat coefficients put one point of
/// each kind on a roughly comparable footing before the set multiplier.
fn gimo_offense(mod_: &Mod) -> f64 {
    let set_bonus = match mod_.set {
        ModSet::Offense => 25.0,
        ModSet::Speed => 25.0,
        ModSet::CritDmg => 20.0,
        ModSet::CritChance => 10.0,
        ModSet::Potency => 10.0,
        ModSet::Health | ModSet::Defense | ModSet::Tenacity => 0.0,
    };
    let stats: f64 = mod_
        .secondaries
        .iter()
        .map(|s| {
            let coefficient = match s.kind {
                ModStatKind::Speed => 6.0,
                ModStatKind::Offense => 0.33,
                ModStatKind::OffensePercent => 24.0,
                ModStatKind::CritChancePercent => 8.0,
                ModStatKind::PotencyPercent => 4.0,
                _ => 0.0,
            };
            s.value * coefficient
        })
        .sum();
    set_bonus + stats
}

/// Stat-kind and primary compatibility for a 6-pip archetype.
struct Archetype {
    sets: &'static [ModSet],
    secondaries: &'static [ModStatKind],
    /// Acceptable primaries for the variable-primary slots, in
    /// (arrow, triangle, circle, cross) order.
    primaries: [&'static [ModStatKind]; 4],
}

static OFFENSE_ARCHETYPE: Archetype = Archetype {
    sets: &[
        ModSet::Offense,
        ModSet::Speed,
        ModSet::CritDmg,
        ModSet::CritChance,
        ModSet::Potency,
    ],
    secondaries: &[
        ModStatKind::Speed,
        ModStatKind::Offense,
        ModStatKind::OffensePercent,
        ModStatKind::CritChancePercent,
        ModStatKind::PotencyPercent,
    ],
    primaries: [
        &[ModStatKind::Speed, ModStatKind::OffensePercent, ModStatKind::AccuracyPercent],
        &[
            ModStatKind::CritDmgPercent,
            ModStatKind::CritChancePercent,
            ModStatKind::OffensePercent,
        ],
        &[ModStatKind::HealthPercent, ModStatKind::ProtectionPercent],
        &[ModStatKind::OffensePercent, ModStatKind::PotencyPercent],
    ],
};

static DEFENSE_ARCHETYPE: Archetype = Archetype {
    sets: &[ModSet::Health, ModSet::Defense, ModSet::Tenacity],
    secondaries: &[
        ModStatKind::Speed,
        ModStatKind::Health,
        ModStatKind::HealthPercent,
        ModStatKind::Protection,
        ModStatKind::ProtectionPercent,
        ModStatKind::Defense,
        ModStatKind::DefensePercent,
        ModStatKind::TenacityPercent,
    ],
    primaries: [
        &[
            ModStatKind::Speed,
            ModStatKind::DefensePercent,
            ModStatKind::HealthPercent,
            ModStatKind::ProtectionPercent,
            ModStatKind::CritAvoidPercent,
        ],
        &[
            ModStatKind::HealthPercent,
            ModStatKind::ProtectionPercent,
            ModStatKind::DefensePercent,
        ],
        &[ModStatKind::HealthPercent, ModStatKind::ProtectionPercent],
        &[
            ModStatKind::HealthPercent,
            ModStatKind::ProtectionPercent,
            ModStatKind::DefensePercent,
            ModStatKind::TenacityPercent,
        ],
    ],
};

/// Rolls-weighted score over the archetype-relevant secondaries.
///
/// Zero unless the set and slot-appropriate primary fit the archetype.
/// Rolls spent on irrelevant stats stay in the denominator, so wasted
/// rolls drag the score down.
fn pure_archetype(mod_: &Mod, archetype: &Archetype) -> f64 {
    if !archetype.sets.contains(&mod_.set) {
        return 0.0;
    }
    if !primary_fits(mod_, archetype) {
        return 0.0;
    }
    let total_rolls: u32 = mod_.secondaries.iter().map(|s| u32::from(s.rolls)).sum();
    if total_rolls == 0 {
        return 0.0;
    }
    let relevant: f64 = mod_
        .secondaries
        .iter()
        .filter(|s| archetype.secondaries.contains(&s.kind))
        .map(|s| s.score(mod_.pips) * f64::from(s.rolls))
        .sum();
    relevant / f64::from(total_rolls)
}

fn primary_fits(mod_: &Mod, archetype: &Archetype) -> bool {
    let allowed = match mod_.slot {
        // Fixed-primary slots always fit.
        ModSlot::Square | ModSlot::Diamond => return true,
        ModSlot::Arrow => archetype.primaries[0],
        ModSlot::Triangle => archetype.primaries[1],
        ModSlot::Circle => archetype.primaries[2],
        ModSlot::Cross => archetype.primaries[3],
    };
    allowed.contains(&mod_.primary.kind)
}
