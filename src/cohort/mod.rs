//! Comparison cohort filtering.
//!
//! Builds the peer group a participant is compared against: the roster minus
//! the participant, narrowed by a [`FilterSpec`]. The filters are commutative
//! conjunctions, so application order cannot affect the result. An empty
//! cohort is a valid result, not an error.

use crate::models::{FilterSpec, ParticipantId, ParticipantResult};

/// Whether a participant passes every restriction in the filter.
fn matches(spec: &FilterSpec, p: &ParticipantResult) -> bool {
    if !spec.gender.matches(p.gender) {
        return false;
    }
    if !spec.start_groups.is_empty() && !spec.start_groups.contains(&p.start_group) {
        return false;
    }
    if !spec.age_groups.is_empty() && !spec.age_groups.contains(&p.category) {
        return false;
    }
    if spec.finishers_only && !p.is_finisher() {
        return false;
    }
    true
}

/// Build the comparison cohort for a target participant.
///
/// The target itself is always excluded; a participant is never compared
/// against themselves. The result borrows from the roster and carries no
/// ordering guarantee.
pub fn filter_cohort<'a>(
    roster: &'a [ParticipantResult],
    target_id: &ParticipantId,
    spec: &FilterSpec,
) -> Vec<&'a ParticipantResult> {
    roster
        .iter()
        .filter(|p| p.id != *target_id)
        .filter(|p| matches(spec, p))
        .collect()
}
