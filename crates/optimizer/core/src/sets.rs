//! Set bonuses and the small/max tier counting discipline.

use crate::mods::{Mod, ModSet};
use crate::stats::{ModStatKind, StatValue};

/// A set family's bonus definition.
///
/// `small_bonus` applies per completed threshold group of not-fully-leveled
/// mods; `max_bonus` per group of fully-leveled (or to-be-leveled/sliced)
/// mods.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetBonus {
    pub set: ModSet,
    /// Mods required per threshold group (2 or 4).
    pub count: u8,
    pub small_bonus: StatValue,
    pub max_bonus: StatValue,
}

impl SetBonus {
    /// The static bonus definition for a set, with the live game's values.
    pub fn of(set: ModSet) -> &'static SetBonus {
        &SET_BONUSES[set.as_index()]
    }
}

const fn bonus(
    set: ModSet,
    count: u8,
    kind: ModStatKind,
    small: f64,
    max: f64,
) -> SetBonus {
    SetBonus {
        set,
        count,
        small_bonus: StatValue::new(kind, small),
        max_bonus: StatValue::new(kind, max),
    }
}

static SET_BONUSES: [SetBonus; ModSet::COUNT] = [
    bonus(ModSet::Health, 2, ModStatKind::HealthPercent, 5.0, 10.0),
    bonus(ModSet::Defense, 2, ModStatKind::DefensePercent, 12.5, 25.0),
    bonus(ModSet::CritDmg, 4, ModStatKind::CritDmgPercent, 15.0, 30.0),
    bonus(ModSet::CritChance, 2, ModStatKind::CritChancePercent, 4.0, 8.0),
    bonus(ModSet::Tenacity, 2, ModStatKind::TenacityPercent, 10.0, 20.0),
    bonus(ModSet::Offense, 4, ModStatKind::OffensePercent, 7.5, 15.0),
    bonus(ModSet::Potency, 2, ModStatKind::PotencyPercent, 7.5, 15.0),
    bonus(ModSet::Speed, 4, ModStatKind::SpeedPercent, 5.0, 10.0),
];

/// Per-set mod counts split by leveling tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetTally {
    total: [u8; ModSet::COUNT],
    max: [u8; ModSet::COUNT],
}

impl SetTally {
    /// Counts a group of mods. `counts_max` decides whether a mod's
    /// membership lands in the max tier (level 15, or it will be leveled
    /// under the active plan).
    pub fn tally<'a>(
        mods: impl IntoIterator<Item = &'a Mod>,
        mut counts_max: impl FnMut(&Mod) -> bool,
    ) -> Self {
        let mut tally = Self::default();
        for mod_ in mods {
            tally.total[mod_.set.as_index()] += 1;
            if counts_max(mod_) {
                tally.max[mod_.set.as_index()] += 1;
            }
        }
        tally
    }

    /// Adds a single mod's membership to the tally.
    pub fn add_mod(&mut self, set: ModSet, counts_max: bool) {
        self.total[set.as_index()] += 1;
        if counts_max {
            self.max[set.as_index()] += 1;
        }
    }

    /// Total mods counted for a set, both tiers.
    pub fn count(&self, set: ModSet) -> u8 {
        self.total[set.as_index()]
    }

    /// (small, max) threshold-group multipliers for a set.
    ///
    /// Max-tier groups consume their mods before the small multiplier is
    /// computed: a mod never contributes to both tiers.
    pub fn multipliers(&self, set: ModSet) -> (u8, u8) {
        let required = SetBonus::of(set).count;
        let max_mult = self.max[set.as_index()] / required;
        let consumed = max_mult * required;
        let small_mult = (self.total[set.as_index()] - consumed) / required;
        (small_mult, max_mult)
    }

    /// The realized bonus stats, one entry per set with a nonzero
    /// multiplier, already scaled by the multiplier.
    pub fn bonuses(&self) -> impl Iterator<Item = StatValue> + '_ {
        ModSet::all().into_iter().flat_map(move |set| {
            let definition = SetBonus::of(set);
            let (small, max) = self.multipliers(set);
            let small_value = definition.small_bonus.value * f64::from(small);
            let max_value = definition.max_bonus.value * f64::from(max);
            let kind = definition.small_bonus.kind;
            (small_value + max_value > 0.0)
                .then_some(StatValue::new(kind, small_value + max_value))
        })
    }

    /// True when no set is partially represented: every nonzero count is a
    /// multiple of the set's required count.
    pub fn is_full_sets_only(&self) -> bool {
        ModSet::all().into_iter().all(|set| {
            let count = self.count(set);
            count == 0 || count % SetBonus::of(set).count == 0
        })
    }
}
