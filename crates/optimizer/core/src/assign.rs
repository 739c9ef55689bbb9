//! Multi-character assignment engine.
//!
//! [`AssignmentRun`] is the authoritative reducer for one optimization run.
//! It validates the snapshot up front, then processes the selected
//! characters in priority order, one [`AssignmentRun::step`] per character,
//! threading the shared pool through as explicit state. Cancellation and
//! progress reporting live with the caller, at step granularity.

use std::collections::{BTreeMap, BTreeSet};

use crate::character::CharacterId;
use crate::error::AssignError;
use crate::loadout::ModLoadout;
use crate::mods::{Mod, ModId};
use crate::plan::{MissedGoal, OptimizationPlan};
use crate::search::{
    evaluate_loadout, find_best_loadout, loadout_satisfies_structure, SearchContext, SearchOutcome,
};
use crate::snapshot::{ProfileSnapshot, SelectedCharacter};
use crate::stats::StatSummary;

/// The committed result for one character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModAssignment {
    pub character_id: CharacterId,

    /// The plan the assignment was computed under (after run-global
    /// adjustments such as `force_complete_sets`).
    pub plan: OptimizationPlan,

    pub assigned_mods: Vec<ModId>,
    pub missed_goals: Vec<MissedGoal>,
    pub messages: Vec<String>,
}

/// Step-wise engine over the ordered character list.
///
/// Construction validates every precondition; afterwards `step()` cannot
/// fail, and the run is abandoned simply by dropping the value — partial
/// state never escapes.
#[derive(Debug)]
pub struct AssignmentRun {
    snapshot: ProfileSnapshot,
    queue: Vec<SelectedCharacter>,
    references: BTreeMap<CharacterId, StatSummary>,
    available: BTreeSet<ModId>,
    index: usize,
    assignments: Vec<ModAssignment>,
}

impl AssignmentRun {
    /// Validates the snapshot and prepares the shared pool.
    ///
    /// Locked characters are dropped from the queue and their equipped mods
    /// removed from the pool up front. Any selected, non-locked character
    /// without stats rejects the whole run before any character is
    /// processed.
    pub fn new(snapshot: &ProfileSnapshot) -> Result<Self, AssignError> {
        let mut seen = BTreeSet::new();
        let mut queue = Vec::new();
        for entry in &snapshot.selected {
            if !seen.insert(entry.id.clone()) {
                return Err(AssignError::DuplicateSelection(entry.id.clone()));
            }
            let character = snapshot
                .character(&entry.id)
                .ok_or_else(|| AssignError::UnknownCharacter(entry.id.clone()))?;
            if snapshot.is_locked(&entry.id) {
                continue;
            }
            if character.stats.is_none() {
                return Err(AssignError::MissingStats(entry.id.clone()));
            }
            queue.push(entry.clone());
        }

        let references = snapshot
            .characters
            .values()
            .filter_map(|c| {
                c.stats
                    .as_ref()
                    .map(|stats| (c.id.clone(), stats.base_summary()))
            })
            .collect();

        let available = snapshot
            .mods
            .iter()
            .filter(|m| {
                m.character
                    .as_ref()
                    .is_none_or(|owner| !snapshot.is_locked(owner))
            })
            .map(|m| m.id.clone())
            .collect();

        Ok(Self {
            snapshot: snapshot.clone(),
            queue,
            references,
            available,
            index: 0,
            assignments: Vec::new(),
        })
    }

    /// Runs every remaining step and returns the full assignment list.
    pub fn run(snapshot: &ProfileSnapshot) -> Result<Vec<ModAssignment>, AssignError> {
        let mut run = Self::new(snapshot)?;
        while run.step().is_some() {}
        Ok(run.into_assignments())
    }

    /// Number of characters this run will process.
    pub fn total_characters(&self) -> usize {
        self.queue.len()
    }

    /// Number of characters already committed.
    pub fn completed_characters(&self) -> usize {
        self.index
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.queue.len()
    }

    /// The character the next `step()` will process.
    pub fn next_character(&self) -> Option<&CharacterId> {
        self.queue.get(self.index).map(|entry| &entry.id)
    }

    /// Processes the next character: searches the current pool, commits the
    /// chosen mods, and removes them from the pool. Returns `None` once the
    /// queue is exhausted.
    pub fn step(&mut self) -> Option<&ModAssignment> {
        let entry = self.queue.get(self.index)?.clone();

        let mut plan = entry.plan;
        if self.snapshot.settings.force_complete_sets {
            plan.use_only_full_sets = true;
        }

        let outcome = {
            let character = self
                .snapshot
                .character(&entry.id)
                .expect("validated at construction");
            let stats = character.stats.as_ref().expect("validated at construction");
            let ctx = SearchContext {
                stats,
                settings: &character.settings,
                plan: &plan,
                references: &self.references,
            };
            let pool: Vec<&Mod> = self
                .snapshot
                .mods
                .iter()
                .filter(|m| self.available.contains(&m.id))
                .collect();

            let mut outcome = find_best_loadout(&pool, &ctx);
            self.apply_change_threshold(&entry.id, &ctx, &mut outcome);
            outcome
        };

        for id in outcome.loadout.mod_ids() {
            self.available.remove(&id);
        }
        self.assignments.push(ModAssignment {
            character_id: entry.id,
            plan,
            assigned_mods: outcome.loadout.mod_ids(),
            missed_goals: outcome.missed_goals,
            messages: outcome.messages,
        });
        self.index += 1;
        self.assignments.last()
    }

    /// Consumes the run, yielding the committed assignments.
    pub fn into_assignments(self) -> Vec<ModAssignment> {
        self.assignments
    }

    /// Keeps the currently-equipped loadout when the fresh one does not
    /// beat it by the configured threshold.
    ///
    /// Only applies when the current mods are all still in the pool and the
    /// current loadout is itself structurally feasible under the plan.
    fn apply_change_threshold(
        &self,
        id: &CharacterId,
        ctx: &SearchContext<'_>,
        outcome: &mut SearchOutcome,
    ) {
        let threshold = self.snapshot.settings.mod_change_threshold;
        if threshold <= 0.0 {
            return;
        }
        let current: Vec<&Mod> = self.snapshot.equipped_mods(id).collect();
        if current.is_empty() || !current.iter().all(|m| self.available.contains(&m.id)) {
            return;
        }
        let current_loadout = ModLoadout::from_mods(current.iter().copied());
        if !loadout_satisfies_structure(&current_loadout, ctx) {
            return;
        }
        let mut kept = evaluate_loadout(&current_loadout, ctx);
        if outcome.value > kept.value * (1.0 + threshold / 100.0) {
            return;
        }
        kept.messages.push(format!(
            "kept current mods; the best new loadout does not improve on them by {threshold}%"
        ));
        *outcome = kept;
    }
}

/// Re-optimizes a single character against a previously-committed
/// assignment list, leaving every other entry fixed.
///
/// The changed character draws from the pool minus every mod the other
/// entries hold. Entries whose relative target stats reference the changed
/// character get an informational message instead of a cascaded re-run.
pub fn reoptimize_character(
    snapshot: &ProfileSnapshot,
    previous: &[ModAssignment],
    character_id: &CharacterId,
) -> Result<Vec<ModAssignment>, AssignError> {
    let entry = snapshot
        .selected
        .iter()
        .find(|s| &s.id == character_id)
        .ok_or_else(|| AssignError::UnknownCharacter(character_id.clone()))?;
    let character = snapshot
        .character(character_id)
        .ok_or_else(|| AssignError::UnknownCharacter(character_id.clone()))?;
    let stats = character
        .stats
        .as_ref()
        .ok_or_else(|| AssignError::MissingStats(character_id.clone()))?;

    let references: BTreeMap<CharacterId, StatSummary> = snapshot
        .characters
        .values()
        .filter_map(|c| {
            c.stats
                .as_ref()
                .map(|stats| (c.id.clone(), stats.base_summary()))
        })
        .collect();

    let taken: BTreeSet<&ModId> = previous
        .iter()
        .filter(|a| &a.character_id != character_id)
        .flat_map(|a| a.assigned_mods.iter())
        .collect();

    let mut plan = entry.plan.clone();
    if snapshot.settings.force_complete_sets {
        plan.use_only_full_sets = true;
    }
    let ctx = SearchContext {
        stats,
        settings: &character.settings,
        plan: &plan,
        references: &references,
    };

    let pool: Vec<&Mod> = snapshot
        .mods
        .iter()
        .filter(|m| {
            !taken.contains(&m.id)
                && m.character
                    .as_ref()
                    .is_none_or(|owner| !snapshot.is_locked(owner))
        })
        .collect();

    let outcome = find_best_loadout(&pool, &ctx);
    let fresh = ModAssignment {
        character_id: character_id.clone(),
        plan,
        assigned_mods: outcome.loadout.mod_ids(),
        missed_goals: outcome.missed_goals,
        messages: outcome.messages,
    };

    let mut result = Vec::with_capacity(previous.len() + 1);
    let mut replaced = false;
    for assignment in previous {
        if &assignment.character_id == character_id {
            result.push(fresh.clone());
            replaced = true;
            continue;
        }
        let mut assignment = assignment.clone();
        let references_changed = assignment
            .plan
            .target_stats
            .iter()
            .any(|t| t.relative_to.as_ref() == Some(character_id));
        if references_changed {
            assignment.messages.push(format!(
                "a target stat references {character_id}, whose assignment changed; \
                 re-optimizing this character is recommended"
            ));
        }
        result.push(assignment);
    }
    if !replaced {
        result.push(fresh);
    }
    Ok(result)
}
