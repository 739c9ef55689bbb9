//! Slot-independent greedy path.
//!
//! With no constraint coupling the slots, each slot's best candidate by
//! standalone value is the globally best choice for that slot, so the
//! optimal loadout is six independent argmaxes. Candidate lists are already
//! value-ordered with stable id tie-breaks.

use crate::loadout::ModLoadout;

use super::SlotCandidates;

/// Picks the best candidate per slot.
pub(crate) fn best_loadout(candidates: &SlotCandidates) -> ModLoadout {
    candidates.greedy_loadout()
}
