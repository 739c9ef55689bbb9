//! Joint branch-and-bound search for constraint-coupled slots.
//!
//! Depth-first over the six slots in canonical order, candidates tried in
//! descending standalone value, an empty slot as the final option. A node
//! is cut when its optimistic bound (exact partial value + per-remaining-
//! slot bound values + a constant whole-loadout set-bonus ceiling) cannot
//! beat the incumbent, when a set restriction can no longer be completed in
//! the remaining slots, or when a target bound is already violated or
//! unreachable. Mod stat contributions are non-negative, which is what
//! makes the target-maximum cut sound.
//!
//! The incumbent only improves on strictly greater value, so with the
//! deterministic candidate ordering the lexicographically-earliest optimum
//! wins ties and repeated runs reproduce byte-identical results.

use crate::loadout::ModLoadout;
use crate::mods::{ModSet, ModSlot};
use crate::projection::{set_bonus_contribution, ModContribution};
use crate::sets::{SetBonus, SetTally};
use crate::stats::{CharStatKind, StatSummary, StatValue};

use super::{ResolvedTarget, SearchContext, SlotCandidates};

/// Runs the joint search. Returns `None` when no loadout satisfies the set
/// restrictions, the full-sets rule, and the given target bounds.
pub(crate) fn search(
    candidates: &SlotCandidates,
    ctx: &SearchContext<'_>,
    targets: &[ResolvedTarget],
) -> Option<ModLoadout> {
    // Without target stats, same-set same-tier candidates within a slot
    // only differ by value; collapsing them keeps the search exact and
    // small. Nonzero armor/resistance weights make the value nonlinear in
    // the mods (concave defense conversion), so standalone ordering no
    // longer decides and the full lists are kept.
    let value_is_linear = ctx.plan.weight(CharStatKind::Armor) == 0.0
        && ctx.plan.weight(CharStatKind::Resistance) == 0.0;
    let collapsed;
    let candidates = if targets.is_empty() && value_is_linear {
        collapsed = candidates.collapsed_by_set();
        &collapsed
    } else {
        candidates
    };

    Searcher::new(candidates, ctx, targets).run()
}

struct Searcher<'a> {
    candidates: &'a SlotCandidates,
    ctx: &'a SearchContext<'a>,
    targets: &'a [ResolvedTarget],

    /// (set, required mod count) per restriction.
    requirements: Vec<(ModSet, u8)>,
    full_sets: bool,

    /// `suffix_bounds[i]`: best possible weighted value from slots `i..`.
    suffix_bounds: [f64; ModSlot::COUNT + 1],
    /// Ceiling on any loadout's set-bonus value contribution.
    bonus_ceiling: f64,
    /// Per target: best possible stat delta from slots `i..`.
    target_suffix: Vec<[f64; ModSlot::COUNT + 1]>,
    /// Per target: ceiling on the set bonuses' stat delta.
    target_bonus_ceiling: Vec<f64>,

    best_value: f64,
    best: Option<[Option<usize>; ModSlot::COUNT]>,
}

impl<'a> Searcher<'a> {
    fn new(
        candidates: &'a SlotCandidates,
        ctx: &'a SearchContext<'a>,
        targets: &'a [ResolvedTarget],
    ) -> Self {
        let requirements: Vec<(ModSet, u8)> = ctx
            .plan
            .set_restrictions
            .iter()
            .map(|(&set, &sets)| (set, sets * SetBonus::of(set).count))
            .collect();

        let mut suffix_bounds = [0.0; ModSlot::COUNT + 1];
        for slot in ModSlot::all().into_iter().rev() {
            let index = slot.as_index();
            let best = candidates
                .slot(slot)
                .iter()
                .map(|c| c.bound_value)
                .fold(0.0_f64, f64::max);
            suffix_bounds[index] = suffix_bounds[index + 1] + best;
        }

        let target_suffix = targets
            .iter()
            .map(|target| {
                let mut suffix = [0.0; ModSlot::COUNT + 1];
                for slot in ModSlot::all().into_iter().rev() {
                    let index = slot.as_index();
                    let best = candidates
                        .slot(slot)
                        .iter()
                        .map(|c| c.summary[target.target.stat])
                        .fold(0.0_f64, f64::max);
                    suffix[index] = suffix[index + 1] + best;
                }
                suffix
            })
            .collect();

        // At most three threshold groups fit in six slots, so three of the
        // single most valuable unit bonus bound every composition.
        let bonus_ceiling = 3.0 * max_unit_bonus(ctx);
        let target_bonus_ceiling = targets
            .iter()
            .map(|target| 3.0 * max_unit_bonus_stat(ctx, target.target.stat))
            .collect();

        Self {
            candidates,
            ctx,
            targets,
            requirements,
            full_sets: ctx.plan.use_only_full_sets,
            suffix_bounds,
            bonus_ceiling,
            target_suffix,
            target_bonus_ceiling,
            best_value: f64::NEG_INFINITY,
            best: None,
        }
    }

    fn run(mut self) -> Option<ModLoadout> {
        let mut chosen = [None; ModSlot::COUNT];
        let acc = ModContribution::new();
        let tally = SetTally::default();
        self.descend(0, &mut chosen, &acc, tally);

        self.best.map(|indices| {
            let mut loadout = ModLoadout::empty();
            for slot in ModSlot::all() {
                if let Some(index) = indices[slot.as_index()] {
                    loadout = loadout.with_mod(self.candidates.slot(slot)[index].mod_.clone());
                }
            }
            loadout
        })
    }

    fn descend(
        &mut self,
        depth: usize,
        chosen: &mut [Option<usize>; ModSlot::COUNT],
        acc: &ModContribution,
        tally: SetTally,
    ) {
        if depth == ModSlot::COUNT {
            self.visit_leaf(chosen, acc, &tally);
            return;
        }
        if self.is_cut(depth, acc, &tally) {
            return;
        }

        let list = self.candidates.slot(ModSlot::all()[depth]);
        for (index, candidate) in list.iter().enumerate() {
            chosen[depth] = Some(index);
            let mut next_acc = *acc;
            next_acc.add(&candidate.contribution);
            let mut next_tally = tally;
            next_tally.add_mod(candidate.mod_.set, candidate.mod_.is_max_level());
            self.descend(depth + 1, chosen, &next_acc, next_tally);
        }
        chosen[depth] = None;
        self.descend(depth + 1, chosen, acc, tally);
    }

    fn visit_leaf(
        &mut self,
        chosen: &[Option<usize>; ModSlot::COUNT],
        acc: &ModContribution,
        tally: &SetTally,
    ) {
        for &(set, mods_required) in &self.requirements {
            if tally.count(set) < mods_required {
                return;
            }
        }
        if self.full_sets && !tally.is_full_sets_only() {
            return;
        }

        let mut total = *acc;
        total.add(&set_bonus_contribution(tally, self.ctx.stats));
        let summary = total.finish(self.ctx.stats);

        if !self.targets.iter().all(|t| t.is_met(&summary)) {
            return;
        }

        let value = summary.dot(&self.ctx.plan.weights);
        if value > self.best_value {
            self.best_value = value;
            self.best = Some(*chosen);
        }
    }

    fn is_cut(&self, depth: usize, acc: &ModContribution, tally: &SetTally) -> bool {
        let slots_left = (ModSlot::COUNT - depth) as u8;

        // Set restrictions that no longer fit in the remaining slots.
        let deficit: u8 = self
            .requirements
            .iter()
            .map(|&(set, required)| required.saturating_sub(tally.count(set)))
            .sum();
        if deficit > slots_left {
            return true;
        }

        // Partial sets that can no longer be completed.
        if self.full_sets {
            let completion: u8 = ModSet::all()
                .into_iter()
                .map(|set| {
                    let remainder = tally.count(set) % SetBonus::of(set).count;
                    if remainder == 0 {
                        0
                    } else {
                        SetBonus::of(set).count - remainder
                    }
                })
                .sum();
            if completion > slots_left {
                return true;
            }
        }

        let summary = acc.finish(self.ctx.stats);

        for (index, target) in self.targets.iter().enumerate() {
            let achieved = target.achieved(&summary);
            // Contributions never decrease a stat.
            if achieved > target.maximum {
                return true;
            }
            let reachable = achieved
                + self.target_suffix[index][depth]
                + self.target_bonus_ceiling[index];
            if reachable < target.minimum {
                return true;
            }
        }

        if self.best.is_some() {
            let optimistic =
                summary.dot(&self.ctx.plan.weights) + self.suffix_bounds[depth] + self.bonus_ceiling;
            if optimistic <= self.best_value {
                return true;
            }
        }

        false
    }
}

/// The most valuable single threshold-group bonus across all sets, by
/// weighted value. Never negative.
fn max_unit_bonus(ctx: &SearchContext<'_>) -> f64 {
    ModSet::all()
        .into_iter()
        .flat_map(|set| {
            let definition = SetBonus::of(set);
            [definition.small_bonus, definition.max_bonus]
        })
        .map(|bonus| bonus_value(ctx, bonus).1)
        .fold(0.0_f64, f64::max)
}

/// The largest single threshold-group delta any set bonus can add to one
/// stat. Never negative.
fn max_unit_bonus_stat(ctx: &SearchContext<'_>, stat: CharStatKind) -> f64 {
    ModSet::all()
        .into_iter()
        .flat_map(|set| {
            let definition = SetBonus::of(set);
            [definition.small_bonus, definition.max_bonus]
        })
        .map(|bonus| bonus_value(ctx, bonus).0[stat])
        .fold(0.0_f64, f64::max)
}

fn bonus_value(ctx: &SearchContext<'_>, bonus: StatValue) -> (StatSummary, f64) {
    let mut contribution = ModContribution::new();
    contribution.add_stat(bonus, ctx.stats);
    let summary = contribution.finish(ctx.stats);
    let value: f64 = summary
        .iter()
        .map(|(kind, delta)| (delta * ctx.plan.weight(kind)).max(0.0))
        .sum();
    (summary, value)
}
