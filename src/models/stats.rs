//! Derived statistics models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Min/max/mean summary of a numeric sample.
///
/// Only constructible from a non-empty sample, so consumers never see NaN or
/// infinities from degenerate aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,

    /// Sample size the summary was computed over
    pub count: usize,
}

impl DistributionSummary {
    /// Summarize a sample; `None` for an empty sample.
    pub fn from_sample(sample: &[f64]) -> Option<Self> {
        if sample.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in sample {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }

        Some(Self {
            min,
            max,
            avg: sum / sample.len() as f64,
            count: sample.len(),
        })
    }

    /// Summarize an integer sample (elapsed seconds).
    pub fn from_seconds(sample: &[u64]) -> Option<Self> {
        let values: Vec<f64> = sample.iter().map(|&s| s as f64).collect();
        Self::from_sample(&values)
    }
}

/// Aggregate statistics for one loaded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceStatistics {
    /// Finish time summary over finishers; `None` when nobody finished
    pub finish_times: Option<DistributionSummary>,

    /// Pace summary in seconds per kilometer over finishers with a resolved
    /// terminal distance
    pub paces: Option<DistributionSummary>,

    /// Number of finishers
    pub total_finishers: u32,

    /// Number of non-finishers
    pub dnf_count: u32,

    /// Per-checkpoint elapsed-time summaries, keyed by checkpoint name;
    /// checkpoints nobody reached are absent
    pub checkpoint_stats: HashMap<String, DistributionSummary>,

    /// When these statistics were computed
    pub computed_at: DateTime<Utc>,
}

impl RaceStatistics {
    /// Summary for a checkpoint name, if anyone reached it.
    pub fn checkpoint(&self, name: &str) -> Option<&DistributionSummary> {
        self.checkpoint_stats.get(name)
    }
}
