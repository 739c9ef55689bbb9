//! Six-slot loadouts and the scalar value function.

use crate::character::{CharacterStats, OptimizerSettings};
use crate::mods::{Mod, ModId, ModSlot};
use crate::plan::OptimizationPlan;
use crate::projection::{mod_contribution, prepare_mod, set_bonus_contribution, ModContribution};
use crate::sets::SetTally;
use crate::stats::StatSummary;

/// Up to one mod per equipment slot, all conceptually belonging to one
/// character.
///
/// Immutable: [`ModLoadout::with_mod`] returns a new value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModLoadout {
    slots: [Option<Mod>; ModSlot::COUNT],
}

impl ModLoadout {
    /// Creates an empty loadout.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a loadout from mods, keyed by their own slots.
    ///
    /// A later mod for an already-filled slot replaces the earlier one.
    pub fn from_mods<'a>(mods: impl IntoIterator<Item = &'a Mod>) -> Self {
        let mut loadout = Self::empty();
        for mod_ in mods {
            loadout.slots[mod_.slot.as_index()] = Some(mod_.clone());
        }
        loadout
    }

    /// Returns a copy with `mod_` placed in its slot.
    pub fn with_mod(&self, mod_: Mod) -> Self {
        let mut next = self.clone();
        let idx = mod_.slot.as_index();
        next.slots[idx] = Some(mod_);
        next
    }

    /// Returns a copy with the given slot emptied.
    pub fn without_slot(&self, slot: ModSlot) -> Self {
        let mut next = self.clone();
        next.slots[slot.as_index()] = None;
        next
    }

    pub fn get(&self, slot: ModSlot) -> Option<&Mod> {
        self.slots[slot.as_index()].as_ref()
    }

    /// Iterates the equipped mods in slot order.
    pub fn mods(&self) -> impl Iterator<Item = &Mod> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.mods().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Ids of the equipped mods, in slot order.
    pub fn mod_ids(&self) -> Vec<ModId> {
        self.mods().map(|m| m.id.clone()).collect()
    }

    /// Set tally of the loadout after the plan's upgrades are applied.
    pub fn set_tally(
        &self,
        settings: &OptimizerSettings,
        plan: &OptimizationPlan,
        with_upgrades: bool,
    ) -> SetTally {
        let prepared: Vec<Mod> = self
            .mods()
            .map(|m| prepare_mod(m, settings, plan, with_upgrades))
            .collect();
        SetTally::tally(prepared.iter(), Mod::is_max_level)
    }

    /// Projects the whole loadout (mods plus realized set bonuses) into
    /// absolute character stat deltas.
    pub fn summary(
        &self,
        base: &CharacterStats,
        settings: &OptimizerSettings,
        plan: &OptimizationPlan,
        with_upgrades: bool,
    ) -> StatSummary {
        let mut contribution = ModContribution::new();
        let mut prepared = Vec::with_capacity(ModSlot::COUNT);
        for mod_ in self.mods() {
            prepared.push(prepare_mod(mod_, settings, plan, with_upgrades));
        }
        for mod_ in &prepared {
            contribution.add(&mod_contribution(mod_, base));
        }
        let tally = SetTally::tally(prepared.iter(), Mod::is_max_level);
        contribution.add(&set_bonus_contribution(&tally, base));
        contribution.finish(base)
    }

    /// Scalar fitness: projected deltas weighted by the plan.
    pub fn value(
        &self,
        base: &CharacterStats,
        settings: &OptimizerSettings,
        plan: &OptimizationPlan,
        with_upgrades: bool,
    ) -> f64 {
        self.summary(base, settings, plan, with_upgrades)
            .dot(&plan.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::{ModSet, ModTier, PrimaryStat, SecondaryStat};
    use crate::stats::{CharStatKind, ModStatKind};

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

    fn health_mod(id: &str, slot: ModSlot) -> Mod {
        Mod::new(
            id,
            slot,
            ModSet::Health,
            5,
            15,
            ModTier::Gold,
            PrimaryStat::new(
                if slot == ModSlot::Square {
                    ModStatKind::OffensePercent
                } else {
                    ModStatKind::HealthPercent
                },
                5.88,
            ),
        )
        .with_secondary(SecondaryStat::new(ModStatKind::Health, 500.0, 2))
    }

    #[test]
    fn summary_includes_set_bonuses() {
        let loadout = ModLoadout::from_mods([
            &health_mod("a", ModSlot::Square),
            &health_mod("b", ModSlot::Arrow),
        ]);
        let base = base();
        let plan = OptimizationPlan::new("t");
        let settings = OptimizerSettings::default();

        let summary = loadout.summary(&base, &settings, &plan, true);
        // Two flat 500s, one 5.88% arrow primary, plus the max health set
        // bonus (10% of 30k).
        let expected = 1_000.0 + 30_000.0 * 0.0588 + 3_000.0;
        assert!((summary[CharStatKind::Health] - expected).abs() < 1e-6);
    }

    #[test]
    fn value_is_weighted_sum() {
        let loadout = ModLoadout::from_mods([&health_mod("a", ModSlot::Arrow)]);
        let base = base();
        let settings = OptimizerSettings::default();
        let plan = OptimizationPlan::new("t").with_weight(CharStatKind::Health, 0.01);

        let summary = loadout.summary(&base, &settings, &plan, true);
        let value = loadout.value(&base, &settings, &plan, true);
        assert!((value - summary[CharStatKind::Health] * 0.01).abs() < 1e-9);
    }

    #[test]
    fn with_mod_replaces_slot() {
        let first = health_mod("a", ModSlot::Arrow);
        let second = health_mod("b", ModSlot::Arrow);
        let loadout = ModLoadout::empty().with_mod(first).with_mod(second.clone());
        assert_eq!(loadout.len(), 1);
        assert_eq!(loadout.get(ModSlot::Arrow), Some(&second));
    }
}
