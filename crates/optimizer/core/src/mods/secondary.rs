//! Secondary stats and per-roll quality scoring.

use crate::stats::ModStatKind;

/// A single secondary stat line on a mod.
///
/// `rolls` counts how many upgrade rolls landed on this line (1..=5). The
/// quality score judges the accumulated value against the best possible
/// value for that many rolls.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecondaryStat {
    pub kind: ModStatKind,
    pub value: f64,
    pub rolls: u8,
}

impl SecondaryStat {
    pub const MAX_ROLLS: u8 = 5;

    pub const fn new(kind: ModStatKind, value: f64, rolls: u8) -> Self {
        Self { kind, value, rolls }
    }

    /// Roll-quality percentile in [0, 100] for a mod of the given rarity.
    ///
    /// 6-pip values are first downgraded onto the 5-pip reference curve:
    /// their rolls are judged against a stricter ceiling.
    pub fn score(&self, pips: u8) -> f64 {
        let ceiling = max_roll(self.kind) * f64::from(self.rolls.max(1));
        if ceiling <= 0.0 || !ceiling.is_finite() {
            return 0.0;
        }
        let value = if pips >= 6 {
            self.downgraded().value
        } else {
            self.value
        };
        (100.0 * value / ceiling).clamp(0.0, 100.0)
    }

    /// The 5-pip-equivalent stat line for a 6-pip value.
    pub fn downgraded(&self) -> Self {
        Self {
            value: self.value / slice_ratio(self.kind),
            ..*self
        }
    }

    /// The 6-pip stat line produced by slicing a 5-pip mod.
    pub fn sliced(&self) -> Self {
        Self {
            value: self.value * slice_ratio(self.kind),
            ..*self
        }
    }
}

/// Best possible value of a single roll at 5 pips.
fn max_roll(kind: ModStatKind) -> f64 {
    match kind {
        ModStatKind::Speed => 6.0,
        ModStatKind::Health => 428.6,
        ModStatKind::HealthPercent => 1.125,
        ModStatKind::Protection => 830.6,
        ModStatKind::ProtectionPercent => 2.25,
        ModStatKind::Offense => 45.6,
        ModStatKind::OffensePercent => 0.563,
        ModStatKind::Defense => 9.8,
        ModStatKind::DefensePercent => 1.7,
        ModStatKind::CritChancePercent => 2.25,
        ModStatKind::PotencyPercent => 2.25,
        ModStatKind::TenacityPercent => 2.25,
        // Kinds that never roll as secondaries.
        ModStatKind::SpeedPercent
        | ModStatKind::CritDmgPercent
        | ModStatKind::AccuracyPercent
        | ModStatKind::CritAvoidPercent => f64::INFINITY,
    }
}

/// Ratio between the 6-pip and 5-pip per-roll ceilings.
///
/// Slicing multiplies every secondary by this factor; scoring divides it
/// back out.
fn slice_ratio(kind: ModStatKind) -> f64 {
    match kind {
        ModStatKind::Speed => 1.05,
        _ => 1.10,
    }
}
