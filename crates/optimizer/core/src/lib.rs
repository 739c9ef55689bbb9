//! Deterministic mod-assignment optimization engine.
//!
//! `optimizer-core` defines the canonical data model (stats, mods, sets,
//! plans, loadouts) and exposes pure APIs for scoring, projection, the
//! per-character loadout search, and the multi-character assignment run.
//! Everything here is synchronous and deterministic: byte-identical
//! snapshots produce byte-identical assignments. The async orchestration
//! shell lives in the `runtime` crate and drives [`assign::AssignmentRun`]
//! one character at a time.

pub mod assign;
pub mod character;
pub mod error;
pub mod loadout;
pub mod mods;
pub mod plan;
pub mod projection;
pub mod search;
pub mod sets;
pub mod snapshot;
pub mod stats;

pub use assign::{reoptimize_character, AssignmentRun, ModAssignment};
pub use character::{Character, CharacterId, CharacterStats, OptimizerSettings};
pub use error::AssignError;
pub use loadout::ModLoadout;
pub use mods::{
    scoring::{ScoreClass, ScoreStrategy},
    Mod, ModId, ModSet, ModSlot, ModTier, PrimaryStat, SecondaryStat,
};
pub use plan::{
    basic_weight_scale, MissedGoal, OptimizationPlan, TargetStat, TargetStatMode,
};
pub use search::{find_best_loadout, SearchContext, SearchOutcome};
pub use sets::{SetBonus, SetTally};
pub use snapshot::{GlobalSettings, ProfileSnapshot, SelectedCharacter};
pub use stats::{CharStatKind, ModStatKind, StatSummary, StatValue};
