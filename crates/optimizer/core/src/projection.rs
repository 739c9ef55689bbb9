//! Projection of mods and set bonuses into character stat deltas.
//!
//! Raw defense contributions must be accumulated across a whole loadout and
//! converted to armor/resistance percentages once: the conversion
//! `100 * raw / (level * 7.5 + raw)` is nonlinear, so converting per mod and
//! summing would overstate the result. [`ModContribution`] keeps the raw
//! parts separate until [`ModContribution::finish`].

use crate::character::{CharacterStats, OptimizerSettings};
use crate::mods::Mod;
use crate::plan::OptimizationPlan;
use crate::sets::SetTally;
use crate::stats::{CharStatKind, ModStatKind, StatSummary, StatValue};

/// A mod's (or bonus's) stat contribution, with defense still raw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModContribution {
    linear: StatSummary,
    armor_raw: f64,
    resistance_raw: f64,
}

impl ModContribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one stat line in, resolving percent-of-base kinds against the
    /// character's base stats.
    pub fn add_stat(&mut self, stat: StatValue, base: &CharacterStats) {
        let value = stat.value;
        match stat.kind {
            ModStatKind::Health => self.linear.add(CharStatKind::Health, value),
            ModStatKind::HealthPercent => self
                .linear
                .add(CharStatKind::Health, base.health * value / 100.0),
            ModStatKind::Protection => self.linear.add(CharStatKind::Protection, value),
            ModStatKind::ProtectionPercent => self
                .linear
                .add(CharStatKind::Protection, base.protection * value / 100.0),
            ModStatKind::Speed => self.linear.add(CharStatKind::Speed, value),
            ModStatKind::SpeedPercent => self
                .linear
                .add(CharStatKind::Speed, base.speed * value / 100.0),
            ModStatKind::CritDmgPercent => self.linear.add(CharStatKind::CritDmg, value),
            ModStatKind::CritChancePercent => self.linear.add(CharStatKind::CritChance, value),
            ModStatKind::PotencyPercent => self.linear.add(CharStatKind::Potency, value),
            ModStatKind::TenacityPercent => self.linear.add(CharStatKind::Tenacity, value),
            // Offense and defense fan out to both of their character stats.
            ModStatKind::Offense => {
                self.linear.add(CharStatKind::PhysDmg, value);
                self.linear.add(CharStatKind::SpecDmg, value);
            }
            ModStatKind::OffensePercent => {
                self.linear
                    .add(CharStatKind::PhysDmg, base.phys_dmg * value / 100.0);
                self.linear
                    .add(CharStatKind::SpecDmg, base.spec_dmg * value / 100.0);
            }
            ModStatKind::Defense => {
                self.armor_raw += value;
                self.resistance_raw += value;
            }
            ModStatKind::DefensePercent => {
                self.armor_raw += base.armor * value / 100.0;
                self.resistance_raw += base.resistance * value / 100.0;
            }
            ModStatKind::AccuracyPercent => self.linear.add(CharStatKind::Accuracy, value),
            ModStatKind::CritAvoidPercent => self.linear.add(CharStatKind::CritAvoid, value),
        }
    }

    /// Merges another contribution into this one.
    pub fn add(&mut self, other: &ModContribution) {
        self.linear.add_summary(&other.linear);
        self.armor_raw += other.armor_raw;
        self.resistance_raw += other.resistance_raw;
    }

    /// Resolves the accumulated contribution into a stat-delta summary,
    /// converting raw defense into percentage-point deltas at the
    /// character's level.
    pub fn finish(&self, base: &CharacterStats) -> StatSummary {
        let mut summary = self.linear;
        if self.armor_raw != 0.0 {
            summary.add(
                CharStatKind::Armor,
                base.defense_percent(base.armor + self.armor_raw)
                    - base.defense_percent(base.armor),
            );
        }
        if self.resistance_raw != 0.0 {
            summary.add(
                CharStatKind::Resistance,
                base.defense_percent(base.resistance + self.resistance_raw)
                    - base.defense_percent(base.resistance),
            );
        }
        summary
    }
}

/// Applies the plan's and character's upgrade transformations to a mod
/// before projection: level to 15 under `upgrade_mods`, then slice when the
/// character slices and the mod qualifies.
pub fn prepare_mod(
    mod_: &Mod,
    settings: &OptimizerSettings,
    plan: &OptimizationPlan,
    with_upgrades: bool,
) -> Mod {
    if !with_upgrades {
        return mod_.clone();
    }
    let leveled = if plan.upgrade_mods && !mod_.is_max_level() {
        mod_.level_up()
    } else {
        mod_.clone()
    };
    if settings.slice_mods && leveled.can_slice() {
        leveled.slice()
    } else {
        leveled
    }
}

/// A single prepared mod's contribution (primary plus secondaries).
pub fn mod_contribution(mod_: &Mod, base: &CharacterStats) -> ModContribution {
    let mut contribution = ModContribution::new();
    contribution.add_stat(StatValue::new(mod_.primary.kind, mod_.primary.value), base);
    for secondary in &mod_.secondaries {
        contribution.add_stat(StatValue::new(secondary.kind, secondary.value), base);
    }
    contribution
}

/// The contribution of a loadout's realized set bonuses.
pub fn set_bonus_contribution(tally: &SetTally, base: &CharacterStats) -> ModContribution {
    let mut contribution = ModContribution::new();
    for bonus in tally.bonuses() {
        contribution.add_stat(bonus, base);
    }
    contribution
}

/// Projects one mod into absolute character stat deltas.
pub fn project_mod(
    mod_: &Mod,
    base: &CharacterStats,
    settings: &OptimizerSettings,
    plan: &OptimizationPlan,
    with_upgrades: bool,
) -> StatSummary {
    let prepared = prepare_mod(mod_, settings, plan, with_upgrades);
    mod_contribution(&prepared, base).finish(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::{ModSet, ModSlot, ModTier, PrimaryStat, SecondaryStat};

    fn base() -> CharacterStats {
        CharacterStats {
            level: 85,
            health: 30_000.0,
            protection: 40_000.0,
            speed: 120.0,
            crit_dmg: 150.0,
            potency: 40.0,
            tenacity: 35.0,
            phys_dmg: 3_000.0,
            spec_dmg: 2_000.0,
            crit_chance: 25.0,
            armor: 300.0,
            resistance: 200.0,
            accuracy: 0.0,
            crit_avoid: 0.0,
        }
    }

    #[test]
    fn percent_stats_scale_off_base() {
        let mod_ = Mod::new(
            "m",
            ModSlot::Square,
            ModSet::Health,
            5,
            15,
            ModTier::Gold,
            PrimaryStat::new(ModStatKind::OffensePercent, 5.88),
        )
        .with_secondary(SecondaryStat::new(ModStatKind::HealthPercent, 1.0, 1));

        let base = base();
        let summary = project_mod(
            &mod_,
            &base,
            &OptimizerSettings::default(),
            &OptimizationPlan::new("t"),
            true,
        );
        assert!((summary[CharStatKind::PhysDmg] - 3_000.0 * 0.0588).abs() < 1e-9);
        assert!((summary[CharStatKind::SpecDmg] - 2_000.0 * 0.0588).abs() < 1e-9);
        assert!((summary[CharStatKind::Health] - 300.0).abs() < 1e-9);
    }

    #[test]
    fn defense_converts_once_per_loadout() {
        let base = base();
        let mut stat = ModContribution::new();
        stat.add_stat(StatValue::new(ModStatKind::Defense, 10.0), &base);
        let mut twice = stat;
        twice.add(&stat);

        let one = stat.finish(&base)[CharStatKind::Armor];
        let two = twice.finish(&base)[CharStatKind::Armor];
        // Nonlinear: the second 10 raw defense is worth less than the first.
        assert!(two < 2.0 * one);
        assert!(two > one);
    }

    #[test]
    fn upgrades_apply_before_projection() {
        let mod_ = Mod::new(
            "m",
            ModSlot::Arrow,
            ModSet::Speed,
            5,
            1,
            ModTier::Grey,
            PrimaryStat::new(ModStatKind::Speed, 5.0),
        );
        let base = base();
        let mut plan = OptimizationPlan::new("t");
        plan.upgrade_mods = true;

        let without = project_mod(&mod_, &base, &OptimizerSettings::default(), &plan, false);
        assert_eq!(without[CharStatKind::Speed], 5.0);

        let with = project_mod(&mod_, &base, &OptimizerSettings::default(), &plan, true);
        assert_eq!(with[CharStatKind::Speed], 30.0);
    }

    #[test]
    fn slicing_projects_six_pip_values() {
        let mod_ = Mod::new(
            "m",
            ModSlot::Arrow,
            ModSet::Speed,
            5,
            15,
            ModTier::Gold,
            PrimaryStat::new(ModStatKind::Speed, 30.0),
        );
        let base = base();
        let settings = OptimizerSettings {
            slice_mods: true,
            ..OptimizerSettings::default()
        };
        let summary = project_mod(&mod_, &base, &settings, &OptimizationPlan::new("t"), true);
        assert_eq!(summary[CharStatKind::Speed], 32.0);
    }
}
