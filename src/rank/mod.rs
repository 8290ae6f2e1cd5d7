//! Position assignment.
//!
//! Computes overall finish-order positions and per-checkpoint positions across
//! a full roster. Recomputing over the same roster is idempotent; ties on
//! elapsed time keep input order (stable sort).

use std::collections::BTreeSet;

use crate::models::ParticipantResult;

/// Assign overall and per-checkpoint positions across the roster.
///
/// Finishers are ranked 1..=N by ascending finish time; non-finishers keep
/// `position == None` and are excluded from every ranking, the per-checkpoint
/// ones included. For each checkpoint name observed anywhere in the roster,
/// finishers who reached it are ranked 1..=M by ascending elapsed time within
/// that subset. An empty roster is a no-op.
pub fn assign_positions(roster: &mut [ParticipantResult]) {
    assign_overall(roster);
    for name in checkpoint_names(roster) {
        assign_at_checkpoint(roster, &name);
    }
}

/// Every distinct checkpoint name observed across the roster, in a stable
/// order.
pub fn checkpoint_names(roster: &[ParticipantResult]) -> BTreeSet<String> {
    roster
        .iter()
        .flat_map(|p| p.checkpoints.iter().map(|cp| cp.name.clone()))
        .collect()
}

fn assign_overall(roster: &mut [ParticipantResult]) {
    let mut order: Vec<(usize, u64)> = roster
        .iter()
        .enumerate()
        .filter_map(|(index, p)| p.finish_seconds().map(|seconds| (index, seconds)))
        .collect();
    order.sort_by_key(|&(_, seconds)| seconds);

    for p in roster.iter_mut() {
        p.position = None;
    }
    for (rank, &(index, _)) in order.iter().enumerate() {
        roster[index].position = Some(rank as u32 + 1);
    }
}

fn assign_at_checkpoint(roster: &mut [ParticipantResult], name: &str) {
    let mut order: Vec<(usize, u64)> = roster
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_finisher())
        .filter_map(|(index, p)| {
            p.checkpoint(name)
                .and_then(|cp| cp.elapsed())
                .map(|seconds| (index, seconds))
        })
        .collect();
    order.sort_by_key(|&(_, seconds)| seconds);

    for p in roster.iter_mut() {
        if let Some(cp) = p.checkpoint_mut(name) {
            cp.position = None;
        }
    }
    for (rank, &(index, _)) in order.iter().enumerate() {
        if let Some(cp) = roster[index].checkpoint_mut(name) {
            cp.position = Some(rank as u32 + 1);
        }
    }
}
