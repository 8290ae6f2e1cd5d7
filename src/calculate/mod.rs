//! Statistics calculation engine.
//!
//! Computes derived metrics over a ranked roster:
//! - Finish time and pace distributions
//! - Per-checkpoint elapsed-time distributions
//! - Relative-to-best / relative-to-average annotation of every reached split
//!
//! Annotation is two-phase: all checkpoint summaries are aggregated first,
//! then every reached record is annotated against them. A participant's own
//! time is part of the aggregate it is compared against.

use std::collections::HashMap;

use chrono::Utc;

use crate::models::{DistributionSummary, ParticipantResult, RaceStatistics};
use crate::rank::checkpoint_names;

/// Compute race statistics and annotate every reached checkpoint record with
/// its relative-to-best and relative-to-average deltas.
pub fn summarize(roster: &mut [ParticipantResult]) -> RaceStatistics {
    let finish_times: Vec<u64> = roster.iter().filter_map(|p| p.finish_seconds()).collect();

    let paces: Vec<f64> = roster
        .iter()
        .filter_map(|p| {
            let seconds = p.finish_seconds()?;
            let terminal = p.terminal_checkpoint()?;
            Some(seconds as f64 / terminal.distance_km)
        })
        .collect();

    // Phase one: aggregate per-checkpoint summaries over everyone who reached
    // each checkpoint.
    let mut checkpoint_stats: HashMap<String, DistributionSummary> = HashMap::new();
    for name in checkpoint_names(roster) {
        let times: Vec<u64> = roster
            .iter()
            .filter_map(|p| p.checkpoint(&name).and_then(|cp| cp.elapsed()))
            .collect();
        if let Some(summary) = DistributionSummary::from_seconds(&times) {
            checkpoint_stats.insert(name, summary);
        }
    }

    // Phase two: annotate reached records against the finished aggregates.
    for p in roster.iter_mut() {
        for cp in p.checkpoints.iter_mut() {
            let Some(seconds) = cp.elapsed() else {
                cp.relative_to_best = None;
                cp.relative_to_average = None;
                continue;
            };
            if let Some(summary) = checkpoint_stats.get(&cp.name) {
                cp.relative_to_best = Some(seconds.saturating_sub(summary.min as u64));
                cp.relative_to_average = Some(seconds as f64 - summary.avg);
            }
        }
    }

    let total_finishers = finish_times.len() as u32;

    RaceStatistics {
        finish_times: DistributionSummary::from_seconds(&finish_times),
        paces: DistributionSummary::from_sample(&paces),
        total_finishers,
        dnf_count: roster.len() as u32 - total_finishers,
        checkpoint_stats,
        computed_at: Utc::now(),
    }
}

/// Median of an integer sample: the central value, or the mean of the two
/// central values for an even count. `None` for an empty sample.
pub fn median(sample: &[u64]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }

    let mut sorted = sample.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}
