//! Primary stats and their rarity-indexed level-15 values.

use crate::stats::ModStatKind;

/// A mod's primary stat.
///
/// Which kinds can appear depends on the slot: square is always offense
/// percent, diamond always defense percent; arrow, triangle, circle, and
/// cross have variable primaries.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryStat {
    pub kind: ModStatKind,
    pub value: f64,
}

impl PrimaryStat {
    pub const fn new(kind: ModStatKind, value: f64) -> Self {
        Self { kind, value }
    }

    /// The primary stat value this kind reaches at level 15 for the given
    /// rarity.
    pub fn at_max_level(kind: ModStatKind, pips: u8) -> Self {
        Self::new(kind, max_value(kind, pips))
    }
}

/// Level-15 primary stat value by rarity (index = pips, 1..=6).
///
/// Values follow the live game's leveling tables.
pub fn max_value(kind: ModStatKind, pips: u8) -> f64 {
    let by_pips: [f64; 6] = match kind {
        ModStatKind::Speed => [17.0, 19.0, 21.0, 26.0, 30.0, 32.0],
        ModStatKind::OffensePercent => [1.88, 2.0, 3.88, 4.0, 5.88, 8.5],
        ModStatKind::DefensePercent => [3.75, 4.0, 7.75, 8.0, 11.75, 20.0],
        ModStatKind::HealthPercent => [1.88, 2.0, 3.88, 4.0, 5.88, 16.0],
        ModStatKind::ProtectionPercent => [7.5, 8.0, 15.5, 16.0, 23.5, 24.0],
        ModStatKind::CritChancePercent => [7.5, 8.0, 8.75, 10.5, 12.0, 20.0],
        ModStatKind::CritDmgPercent => [22.5, 24.0, 27.0, 31.5, 36.0, 42.0],
        ModStatKind::PotencyPercent => [15.0, 16.0, 18.0, 21.0, 24.0, 30.0],
        ModStatKind::TenacityPercent => [15.0, 16.0, 18.0, 21.0, 24.0, 35.0],
        ModStatKind::AccuracyPercent => [7.5, 8.0, 8.75, 10.5, 12.0, 30.0],
        ModStatKind::CritAvoidPercent => [15.0, 16.0, 18.0, 21.0, 24.0, 35.0],
        // Never a primary stat; a zero value keeps callers total.
        ModStatKind::Health
        | ModStatKind::Protection
        | ModStatKind::SpeedPercent
        | ModStatKind::Offense
        | ModStatKind::Defense => [0.0; 6],
    };
    let index = usize::from(pips.clamp(1, 6)) - 1;
    by_pips[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_arrow_values() {
        assert_eq!(max_value(ModStatKind::Speed, 5), 30.0);
        assert_eq!(max_value(ModStatKind::Speed, 6), 32.0);
    }

    #[test]
    fn out_of_range_pips_clamp() {
        assert_eq!(max_value(ModStatKind::Speed, 0), 17.0);
        assert_eq!(max_value(ModStatKind::Speed, 9), 32.0);
    }

    #[test]
    fn at_max_level_builds_primary() {
        let primary = PrimaryStat::at_max_level(ModStatKind::CritDmgPercent, 5);
        assert_eq!(primary.kind, ModStatKind::CritDmgPercent);
        assert_eq!(primary.value, 36.0);
    }
}
