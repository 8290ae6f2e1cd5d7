//! Target-vs-cohort comparison metrics.
//!
//! Every function here is a pure function of the target and cohort. An empty
//! cohort, a cohort with no finishers, or a non-finishing target are valid
//! inputs; the affected metrics come back as `None` ("not applicable"), never
//! as an error or a fake zero.

use serde::{Deserialize, Serialize};

use crate::calculate::median;
use crate::models::{ParticipantResult, FINISH_CHECKPOINT};

/// Comparison of one participant against a cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Cohort size, DNF members included
    pub cohort_size: u32,

    /// Number of cohort members who finished
    pub cohort_finishers: u32,

    /// Share of cohort finishers the target beat, 0-100; `None` when the
    /// target did not finish or the cohort has no finishers
    pub percentile: Option<u32>,

    /// Target finish time minus the fastest cohort finish time, seconds
    pub gap_to_leader: Option<i64>,

    /// Signed gap to the cohort's median finish time (negative = faster)
    pub gap_to_median: Option<f64>,

    /// Signed gap to the cohort's mean finish time (negative = faster)
    pub gap_to_average: Option<f64>,
}

/// Pace distribution at one checkpoint across a cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointPaceSample {
    /// Checkpoint name
    pub checkpoint: String,

    /// Distance from the start in kilometers
    pub distance_km: f64,

    /// Cohort paces at this checkpoint, seconds per kilometer
    pub paces: Vec<f64>,

    /// The target's own pace, when the target reached this checkpoint
    pub target_pace: Option<f64>,
}

/// Compare a target participant against a cohort.
pub fn compare(target: &ParticipantResult, cohort: &[&ParticipantResult]) -> ComparisonReport {
    let finish_times: Vec<u64> = cohort.iter().filter_map(|p| p.finish_seconds()).collect();
    let cohort_finishers = finish_times.len() as u32;

    let Some(target_seconds) = target.finish_seconds() else {
        return ComparisonReport {
            cohort_size: cohort.len() as u32,
            cohort_finishers,
            percentile: None,
            gap_to_leader: None,
            gap_to_median: None,
            gap_to_average: None,
        };
    };

    let percentile = (!finish_times.is_empty()).then(|| {
        let slower = finish_times.iter().filter(|&&t| t > target_seconds).count();
        (100.0 * slower as f64 / finish_times.len() as f64).round() as u32
    });

    let gap_to_leader = finish_times
        .iter()
        .min()
        .map(|&leader| target_seconds as i64 - leader as i64);

    let gap_to_median = median(&finish_times).map(|m| target_seconds as f64 - m);

    let gap_to_average = (!finish_times.is_empty()).then(|| {
        let mean = finish_times.iter().sum::<u64>() as f64 / finish_times.len() as f64;
        target_seconds as f64 - mean
    });

    ComparisonReport {
        cohort_size: cohort.len() as u32,
        cohort_finishers,
        percentile,
        gap_to_leader,
        gap_to_median,
        gap_to_average,
    }
}

/// Per-checkpoint pace distributions across a cohort, with the target's own
/// pace alongside.
///
/// The start marker (distance 0) and the terminal finish split are excluded;
/// checkpoints where nobody in the cohort contributes a pace are omitted
/// entirely. Results are ordered by distance from the start.
pub fn checkpoint_pace_samples(
    target: &ParticipantResult,
    cohort: &[&ParticipantResult],
) -> Vec<CheckpointPaceSample> {
    let mut names: Vec<&str> = Vec::new();
    for p in cohort {
        for cp in &p.checkpoints {
            if cp.name != FINISH_CHECKPOINT && !names.contains(&cp.name.as_str()) {
                names.push(&cp.name);
            }
        }
    }

    let mut samples: Vec<CheckpointPaceSample> = names
        .into_iter()
        .filter_map(|name| {
            let mut distance_km = 0.0;
            let mut paces = Vec::new();
            for p in cohort {
                if let Some(cp) = p.checkpoint(name) {
                    if let Some(pace) = cp.pace() {
                        paces.push(pace);
                        distance_km = cp.distance_km;
                    }
                }
            }
            if paces.is_empty() {
                return None;
            }

            let target_pace = target.checkpoint(name).and_then(|cp| cp.pace());

            Some(CheckpointPaceSample {
                checkpoint: name.to_string(),
                distance_km,
                paces,
                target_pace,
            })
        })
        .collect();

    samples.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckpointRecord, Gender, ParticipantResult};

    fn participant(bib: &str, splits: &[(&str, f64, u64)]) -> ParticipantResult {
        let checkpoints = splits
            .iter()
            .map(|(name, distance, time)| {
                CheckpointRecord::new((*name).to_string(), *distance, *time)
            })
            .collect();
        ParticipantResult::new(
            Some(bib.to_string()),
            "0",
            Gender::Male,
            "H21".to_string(),
            "Elit".to_string(),
            "VL_90".to_string(),
            2024,
            checkpoints,
        )
    }

    fn finisher(bib: &str, finish_seconds: u64) -> ParticipantResult {
        participant(bib, &[("Finish", 90.0, finish_seconds)])
    }

    fn dnf(bib: &str) -> ParticipantResult {
        participant(bib, &[("Smågan", 11.0, 2500)])
    }

    #[test]
    fn test_spec_scenario() {
        // Target 3100 against cohort finishers 3000, 3200, 3300, 3400.
        let target = finisher("t", 3100);
        let others = [
            finisher("1", 3000),
            finisher("2", 3200),
            finisher("3", 3300),
            finisher("4", 3400),
        ];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let report = compare(&target, &cohort);
        assert_eq!(report.cohort_size, 4);
        assert_eq!(report.cohort_finishers, 4);
        assert_eq!(report.percentile, Some(50));
        assert_eq!(report.gap_to_leader, Some(100));
        assert_eq!(report.gap_to_median, Some(-150.0));
        assert_eq!(report.gap_to_average, Some(3100.0 - 3225.0));
    }

    #[test]
    fn test_percentile_boundaries() {
        let others = [
            finisher("1", 3000),
            finisher("2", 3100),
            finisher("3", 3200),
        ];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let fastest = finisher("t", 2900);
        assert_eq!(compare(&fastest, &cohort).percentile, Some(100));

        let slowest = finisher("t", 3500);
        assert_eq!(compare(&slowest, &cohort).percentile, Some(0));
    }

    #[test]
    fn test_dnf_target_not_applicable() {
        let target = dnf("t");
        let others = [finisher("1", 3000)];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let report = compare(&target, &cohort);
        assert_eq!(report.percentile, None);
        assert_eq!(report.gap_to_leader, None);
        assert_eq!(report.gap_to_median, None);
        assert_eq!(report.gap_to_average, None);
        assert_eq!(report.cohort_finishers, 1);
    }

    #[test]
    fn test_empty_cohort_not_applicable() {
        let target = finisher("t", 3100);
        let report = compare(&target, &[]);

        assert_eq!(report.cohort_size, 0);
        assert_eq!(report.cohort_finishers, 0);
        assert_eq!(report.percentile, None);
        assert_eq!(report.gap_to_leader, None);
        assert_eq!(report.gap_to_median, None);
        assert_eq!(report.gap_to_average, None);
    }

    #[test]
    fn test_cohort_with_only_dnf_not_applicable() {
        let target = finisher("t", 3100);
        let others = [dnf("1"), dnf("2")];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let report = compare(&target, &cohort);
        assert_eq!(report.cohort_size, 2);
        assert_eq!(report.cohort_finishers, 0);
        assert_eq!(report.percentile, None);
        assert_eq!(report.gap_to_leader, None);
    }

    #[test]
    fn test_dnf_members_excluded_from_numeric_aggregates() {
        let target = finisher("t", 3100);
        let others = [finisher("1", 3000), finisher("2", 3200), dnf("3")];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let report = compare(&target, &cohort);
        assert_eq!(report.cohort_size, 3);
        assert_eq!(report.cohort_finishers, 2);
        // Median over {3000, 3200}, untouched by the DNF entry.
        assert_eq!(report.gap_to_median, Some(0.0));
        assert_eq!(report.percentile, Some(50));
    }

    #[test]
    fn test_pace_samples_exclude_start_and_finish() {
        let target = participant(
            "t",
            &[
                ("Start", 0.0, 1),
                ("Smågan", 11.0, 2200),
                ("Finish", 90.0, 18000),
            ],
        );
        let others = [
            participant(
                "1",
                &[
                    ("Start", 0.0, 1),
                    ("Smågan", 11.0, 2310),
                    ("Finish", 90.0, 18500),
                ],
            ),
            participant("2", &[("Smågan", 11.0, 2090), ("Finish", 90.0, 17500)]),
        ];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let samples = checkpoint_pace_samples(&target, &cohort);
        assert_eq!(samples.len(), 1);

        let sample = &samples[0];
        assert_eq!(sample.checkpoint, "Smågan");
        assert_eq!(sample.distance_km, 11.0);
        assert_eq!(sample.paces.len(), 2);
        assert_eq!(sample.target_pace, Some(200.0));
    }

    #[test]
    fn test_pace_samples_sorted_by_distance() {
        let target = finisher("t", 18000);
        let others = [participant(
            "1",
            &[
                ("Evertsberg", 47.0, 9000),
                ("Smågan", 11.0, 2100),
                ("Oxberg", 62.0, 12500),
                ("Finish", 90.0, 18200),
            ],
        )];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let samples = checkpoint_pace_samples(&target, &cohort);
        let names: Vec<&str> = samples.iter().map(|s| s.checkpoint.as_str()).collect();
        assert_eq!(names, vec!["Smågan", "Evertsberg", "Oxberg"]);
        // Target never reached these, so no target pace.
        assert!(samples.iter().all(|s| s.target_pace.is_none()));
    }

    #[test]
    fn test_pace_samples_omit_empty_checkpoints() {
        let target = finisher("t", 18000);
        // Unresolved distance and unreached splits contribute no pace.
        let others = [
            participant("1", &[("Mystery", 0.0, 4000), ("Finish", 90.0, 18200)]),
            participant("2", &[("Smågan", 11.0, 0), ("Finish", 90.0, 19000)]),
        ];
        let cohort: Vec<&ParticipantResult> = others.iter().collect();

        let samples = checkpoint_pace_samples(&target, &cohort);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_pace_samples_empty_cohort() {
        let target = finisher("t", 18000);
        assert!(checkpoint_pace_samples(&target, &[]).is_empty());
    }
}
