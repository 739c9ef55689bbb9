//! Typed errors surfaced by the assignment engine.

use thiserror::Error;

use crate::character::CharacterId;

/// Precondition failures detected before any character is processed.
///
/// A run is all-or-nothing: any of these rejects the whole snapshot and no
/// partial assignments are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("character {0} is selected but missing from the profile")]
    UnknownCharacter(CharacterId),

    #[error("character {0} is selected but has no recorded stats")]
    MissingStats(CharacterId),

    #[error("character {0} appears more than once in the selection")]
    DuplicateSelection(CharacterId),

    #[error("character {0} is not part of the previous assignment set")]
    NotPreviouslyAssigned(CharacterId),
}
