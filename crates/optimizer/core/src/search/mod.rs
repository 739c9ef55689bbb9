//! Per-character loadout search.
//!
//! Two strategies share the same candidate filtering, feasibility checks,
//! and value function. When nothing couples the six slots (no set
//! restriction, no full-sets rule, no optimized target stat), the best
//! candidate per slot is the best loadout and the greedy path is exact.
//! As soon as any constraint couples slots, the joint branch-and-bound
//! path takes over.

mod candidates;
mod constrained;
mod greedy;

pub(crate) use candidates::SlotCandidates;

use std::collections::BTreeMap;

use crate::character::{CharacterId, CharacterStats, OptimizerSettings};
use crate::loadout::ModLoadout;
use crate::mods::{Mod, ModSlot};
use crate::plan::{MissedGoal, OptimizationPlan, TargetStat, TargetStatMode};
use crate::sets::SetBonus;
use crate::stats::StatSummary;

/// Everything the search needs to know about one character.
pub struct SearchContext<'a> {
    pub stats: &'a CharacterStats,
    pub settings: &'a OptimizerSettings,
    pub plan: &'a OptimizationPlan,

    /// Base stat summaries of the whole roster, for resolving relative
    /// target stats.
    pub references: &'a BTreeMap<CharacterId, StatSummary>,
}

/// Result of one character's search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub loadout: ModLoadout,
    pub summary: StatSummary,
    pub value: f64,
    pub missed_goals: Vec<MissedGoal>,
    pub messages: Vec<String>,
}

/// A target stat with its bounds resolved to absolute final-stat values.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResolvedTarget {
    pub target: TargetStat,
    pub minimum: f64,
    pub maximum: f64,
    /// The character's base value; achieved = base + projected delta.
    pub base: f64,
}

impl ResolvedTarget {
    pub fn achieved(&self, summary: &StatSummary) -> f64 {
        self.base + summary[self.target.stat]
    }

    pub fn is_met(&self, summary: &StatSummary) -> bool {
        let achieved = self.achieved(summary);
        achieved >= self.minimum && achieved <= self.maximum
    }
}

fn resolve_target(target: &TargetStat, ctx: &SearchContext<'_>, messages: &mut Vec<String>) -> ResolvedTarget {
    let base = ctx.stats.base_value(target.stat);
    let reference = target
        .relative_to
        .as_ref()
        .and_then(|id| ctx.references.get(id).map(|summary| summary[target.stat]));

    let (minimum, maximum) = match (&target.relative_to, reference) {
        (None, _) => (target.minimum, target.maximum),
        (Some(_), Some(value)) => match target.mode {
            TargetStatMode::Absolute => (value + target.minimum, value + target.maximum),
            TargetStatMode::Percent => {
                (value * target.minimum / 100.0, value * target.maximum / 100.0)
            }
        },
        (Some(id), None) => {
            messages.push(format!(
                "target {} references {}, which has no recorded stats; bounds treated as absolute",
                target.stat, id
            ));
            (target.minimum, target.maximum)
        }
    };

    ResolvedTarget {
        target: target.clone(),
        minimum,
        maximum,
        base,
    }
}

/// Finds the best feasible loadout for one character from the candidate
/// pool.
///
/// Target-stat bounds degrade gracefully: if no loadout satisfies them, the
/// best structurally-feasible loadout is returned and each unmet target is
/// recorded as a missed goal. Set and primary restrictions never relax
/// silently; an unsatisfiable set restriction falls back to the best
/// unrestricted loadout with an explanatory message.
pub fn find_best_loadout(pool: &[&Mod], ctx: &SearchContext<'_>) -> SearchOutcome {
    let mut messages = Vec::new();

    let all_targets: Vec<ResolvedTarget> = ctx
        .plan
        .target_stats
        .iter()
        .map(|t| resolve_target(t, ctx, &mut messages))
        .collect();
    let optimized: Vec<ResolvedTarget> = all_targets
        .iter()
        .filter(|t| t.target.optimize)
        .cloned()
        .collect();

    let candidates = candidates::build(pool, ctx);
    for slot in ModSlot::all() {
        if candidates.slot(slot).is_empty() {
            messages.push(format!("no eligible mod for the {slot} slot"));
        }
    }

    let loadout = if ctx.plan.couples_slots() {
        constrained::search(&candidates, ctx, &optimized).unwrap_or_else(|| {
            // Target bounds relax first; structural set restrictions only
            // fall away once proven unsatisfiable.
            if let Some(structural) = constrained::search(&candidates, ctx, &[]) {
                structural
            } else {
                messages.push(
                    "set restrictions cannot be satisfied by the available mods; \
                     best unrestricted loadout returned"
                        .to_owned(),
                );
                greedy::best_loadout(&candidates)
            }
        })
    } else {
        greedy::best_loadout(&candidates)
    };

    assess(loadout, &all_targets, ctx, messages)
}

/// Scores an existing loadout under a plan, recording missed goals the same
/// way the search does. Used when deciding whether currently-equipped mods
/// may simply be kept.
pub fn evaluate_loadout(loadout: &ModLoadout, ctx: &SearchContext<'_>) -> SearchOutcome {
    let mut messages = Vec::new();
    let all_targets: Vec<ResolvedTarget> = ctx
        .plan
        .target_stats
        .iter()
        .map(|t| resolve_target(t, ctx, &mut messages))
        .collect();
    assess(loadout.clone(), &all_targets, ctx, messages)
}

fn assess(
    loadout: ModLoadout,
    targets: &[ResolvedTarget],
    ctx: &SearchContext<'_>,
    messages: Vec<String>,
) -> SearchOutcome {
    let summary = loadout.summary(ctx.stats, ctx.settings, ctx.plan, true);
    let value = summary.dot(&ctx.plan.weights);
    let missed_goals = targets
        .iter()
        .filter(|t| !t.is_met(&summary))
        .map(|t| MissedGoal {
            target: t.target.clone(),
            achieved: t.achieved(&summary),
        })
        .collect();

    SearchOutcome {
        loadout,
        summary,
        value,
        missed_goals,
        messages,
    }
}

/// Shared structural feasibility check: pip floor, primary restrictions,
/// set restrictions, and the full-sets rule.
///
/// Enforces the same conditions the joint search enforces, for loadouts
/// that did not come out of it — the orchestrator uses it to decide
/// whether a currently-equipped loadout may be kept.
pub fn loadout_satisfies_structure(loadout: &ModLoadout, ctx: &SearchContext<'_>) -> bool {
    for mod_ in loadout.mods() {
        if mod_.pips < ctx.settings.minimum_mod_dots {
            return false;
        }
        if let Some(required) = ctx.plan.primary_restriction(mod_.slot) {
            if mod_.primary.kind != required {
                return false;
            }
        }
    }

    let tally = loadout.set_tally(ctx.settings, ctx.plan, true);
    for (&set, &sets_required) in &ctx.plan.set_restrictions {
        let mods_required = sets_required * SetBonus::of(set).count;
        if tally.count(set) < mods_required {
            return false;
        }
    }
    if ctx.plan.use_only_full_sets && !tally.is_full_sets_only() {
        return false;
    }
    true
}

#[cfg(test)]
mod tests;
