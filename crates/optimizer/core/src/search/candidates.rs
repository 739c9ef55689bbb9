//! Candidate filtering and per-slot shortlists.

use crate::loadout::ModLoadout;
use crate::mods::{Mod, ModSlot};
use crate::projection::{mod_contribution, prepare_mod, ModContribution};
use crate::stats::{CharStatKind, StatSummary};

use super::SearchContext;

/// One eligible, upgrade-prepared mod with its precomputed standalone
/// contribution.
#[derive(Clone, Debug)]
pub(crate) struct Candidate {
    /// The mod after the plan's level/slice transformations.
    pub mod_: Mod,
    /// Standalone stat deltas (defense converted against the bare base).
    pub summary: StatSummary,
    /// Raw contribution, for exact joint accumulation.
    pub contribution: ModContribution,
    /// Standalone weighted value.
    pub value: f64,
    /// Upper bound on the mod's marginal weighted value inside any partial
    /// loadout. Differs from `value` only for the concave armor/resistance
    /// conversion, whose negative-weight terms are clamped to zero.
    pub bound_value: f64,
}

/// Eligible candidates per slot, sorted by descending value with mod-id
/// tie-breaks for reproducible ordering.
#[derive(Clone, Debug, Default)]
pub(crate) struct SlotCandidates {
    lists: [Vec<Candidate>; ModSlot::COUNT],
}

impl SlotCandidates {
    pub fn slot(&self, slot: ModSlot) -> &[Candidate] {
        &self.lists[slot.as_index()]
    }

    /// The best loadout under the assumption of independent slots.
    pub fn greedy_loadout(&self) -> ModLoadout {
        let mut loadout = ModLoadout::empty();
        for slot in ModSlot::all() {
            if let Some(best) = self.lists[slot.as_index()].first() {
                loadout = loadout.with_mod(best.mod_.clone());
            }
        }
        loadout
    }

    /// Collapses each slot to the best candidate per (set, max-tier) pair.
    ///
    /// Exact for set-constrained searches without target stats: within a
    /// slot, same-set candidates of the same leveling tier are
    /// interchangeable except for value.
    pub fn collapsed_by_set(&self) -> SlotCandidates {
        let mut collapsed = SlotCandidates::default();
        for slot in ModSlot::all() {
            let mut kept: Vec<Candidate> = Vec::new();
            for candidate in self.slot(slot) {
                let key = (candidate.mod_.set, candidate.mod_.is_max_level());
                // Lists are value-ordered, so the first of each key wins.
                if !kept
                    .iter()
                    .any(|c| (c.mod_.set, c.mod_.is_max_level()) == key)
                {
                    kept.push(candidate.clone());
                }
            }
            collapsed.lists[slot.as_index()] = kept;
        }
        collapsed
    }
}

/// Filters the pool down to eligible candidates and prepares them.
///
/// Mods below the character's pip floor are excluded entirely; slots with a
/// primary restriction only admit matching primaries.
pub(crate) fn build(pool: &[&Mod], ctx: &SearchContext<'_>) -> SlotCandidates {
    let mut candidates = SlotCandidates::default();

    for &mod_ in pool {
        if mod_.pips < ctx.settings.minimum_mod_dots {
            continue;
        }
        if let Some(required) = ctx.plan.primary_restriction(mod_.slot) {
            if mod_.primary.kind != required {
                continue;
            }
        }

        let prepared = prepare_mod(mod_, ctx.settings, ctx.plan, true);
        let contribution = mod_contribution(&prepared, ctx.stats);
        let summary = contribution.finish(ctx.stats);
        let value = summary.dot(&ctx.plan.weights);
        let bound_value = bound_value(&summary, ctx);

        candidates.lists[prepared.slot.as_index()].push(Candidate {
            mod_: prepared,
            summary,
            contribution,
            value,
            bound_value,
        });
    }

    for list in &mut candidates.lists {
        list.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(core::cmp::Ordering::Equal)
                .then_with(|| a.mod_.id.cmp(&b.mod_.id))
        });
    }
    candidates
}

/// Weighted standalone value with concave-stat terms clamped so the result
/// never understates the mod's marginal value inside a larger loadout.
fn bound_value(summary: &StatSummary, ctx: &SearchContext<'_>) -> f64 {
    summary
        .iter()
        .map(|(kind, delta)| {
            let term = delta * ctx.plan.weight(kind);
            match kind {
                CharStatKind::Armor | CharStatKind::Resistance => term.max(0.0),
                _ => term,
            }
        })
        .sum()
}
