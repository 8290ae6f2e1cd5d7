//! Transforms raw event JSON into participant records.
//!
//! The dataset is a scrape of the organizer's results service: one JSON array
//! per event, one entry per entrant, with splits keyed by checkpoint location
//! name. Entries are lenient to parse — a bad entry degrades (unassigned bib,
//! unresolved checkpoint distances) but never aborts the roster.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CheckpointRecord, CourseProfile, Gender, ParticipantResult};

/// One timed split in the raw dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSplit {
    /// Elapsed seconds from race start
    #[serde(default)]
    pub time: f64,

    /// Organizer-reported pace in fractional minutes, unused here
    #[serde(default)]
    pub pace: f64,
}

/// One entrant in the raw dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub bib_number: Option<String>,

    #[serde(default)]
    pub age_class: Option<String>,

    #[serde(default)]
    pub start_group: Option<String>,

    #[serde(default)]
    pub splits: HashMap<String, RawSplit>,
}

impl RawEntry {
    /// Bib number with the scraper's "nan" placeholder normalized away.
    fn bib(&self) -> Option<String> {
        match self.bib_number.as_deref() {
            None | Some("") | Some("nan") => None,
            Some(bib) => Some(bib.to_string()),
        }
    }
}

/// Transform raw entries into participant records for one event.
///
/// Checkpoint distances come from the course profile; names the profile does
/// not know resolve to distance 0 and are excluded from pace analysis
/// downstream. Positions and relative fields are left unset for the ranking
/// and statistics passes.
pub fn transform_entries(
    entries: &[RawEntry],
    event_id: &str,
    year: u16,
    course: &CourseProfile,
) -> Vec<ParticipantResult> {
    let mut unresolved = 0usize;

    let roster: Vec<ParticipantResult> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let checkpoints: Vec<CheckpointRecord> = entry
                .splits
                .iter()
                .map(|(location, split)| {
                    let distance_km = match course.distance_for(location) {
                        Some(distance) => distance,
                        None => {
                            unresolved += 1;
                            0.0
                        }
                    };
                    let time_seconds = split.time.max(0.0).round() as u64;
                    CheckpointRecord::new(location.clone(), distance_km, time_seconds)
                })
                .collect();

            let age_class = entry.age_class.clone().unwrap_or_default();

            ParticipantResult::new(
                entry.bib(),
                &format!("entry-{}", index),
                Gender::from_age_class(&age_class),
                age_class,
                entry.start_group.clone().unwrap_or_default(),
                event_id.to_string(),
                year,
                checkpoints,
            )
        })
        .collect();

    if unresolved > 0 {
        debug!(
            event_id,
            unresolved, "checkpoint names not in course profile, kept at distance 0"
        );
    }

    roster
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::CourseProfile;

    fn entry(bib: &str, age_class: &str, start_group: &str, splits: &[(&str, f64)]) -> RawEntry {
        RawEntry {
            bib_number: Some(bib.to_string()),
            age_class: Some(age_class.to_string()),
            start_group: Some(start_group.to_string()),
            splits: splits
                .iter()
                .map(|(name, time)| {
                    (
                        name.to_string(),
                        RawSplit {
                            time: *time,
                            pace: 0.0,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_transform_basic_entry() {
        let course = CourseProfile::vasaloppet_90();
        let raw = vec![entry(
            "417",
            "H21",
            "Elit",
            &[("Smågan", 2200.0), ("Finish", 18000.0)],
        )];

        let roster = transform_entries(&raw, "VL_90", 2024, &course);
        assert_eq!(roster.len(), 1);

        let p = &roster[0];
        assert_eq!(p.display_bib(), "417");
        assert_eq!(p.gender, Gender::Male);
        assert_eq!(p.category, "H21");
        assert_eq!(p.start_group, "Elit");
        assert!(p.is_finisher());
        assert_eq!(p.finish_seconds(), Some(18000));
        assert_eq!(p.checkpoint("Smågan").unwrap().distance_km, 11.0);
    }

    #[test]
    fn test_transform_female_age_class() {
        let course = CourseProfile::vasaloppet_90();
        let raw = vec![entry("9", "D35", "Led 1", &[("Finish", 20000.0)])];

        let roster = transform_entries(&raw, "VL_90", 2024, &course);
        assert_eq!(roster[0].gender, Gender::Female);
    }

    #[test]
    fn test_transform_dnf_entry() {
        let course = CourseProfile::vasaloppet_90();
        let raw = vec![entry("300", "H21", "Led 2", &[("Smågan", 2400.0)])];

        let roster = transform_entries(&raw, "VL_90", 2024, &course);
        assert!(!roster[0].is_finisher());
    }

    #[test]
    fn test_transform_nan_bib_becomes_unassigned() {
        let course = CourseProfile::vasaloppet_90();
        let mut raw = entry("nan", "H21", "", &[("Finish", 19000.0)]);
        raw.bib_number = Some("nan".to_string());

        let roster = transform_entries(&[raw], "VL_90", 2024, &course);
        assert_eq!(roster[0].bib_number, None);
        assert_eq!(roster[0].name, "Athlete (no bib)");
    }

    #[test]
    fn test_transform_missing_bibs_get_distinct_ids() {
        let course = CourseProfile::vasaloppet_90();
        let raw = vec![
            entry("nan", "H21", "", &[("Finish", 19000.0)]),
            entry("nan", "H21", "", &[("Finish", 19500.0)]),
        ];

        let roster = transform_entries(&raw, "VL_90", 2024, &course);
        assert_ne!(roster[0].id, roster[1].id);
    }

    #[test]
    fn test_transform_unknown_checkpoint_kept_at_distance_zero() {
        let course = CourseProfile::vasaloppet_90();
        let raw = vec![entry(
            "12",
            "H21",
            "Elit",
            &[("Mysterious place", 5000.0), ("Finish", 18000.0)],
        )];

        let roster = transform_entries(&raw, "VL_90", 2024, &course);
        let cp = roster[0].checkpoint("Mysterious place").unwrap();
        assert_eq!(cp.distance_km, 0.0);
        assert_eq!(cp.pace(), None);
        // The rest of the entry is unaffected.
        assert!(roster[0].is_finisher());
    }

    #[test]
    fn test_transform_empty_entry_is_tolerated() {
        let course = CourseProfile::vasaloppet_90();
        let raw = vec![RawEntry {
            bib_number: None,
            age_class: None,
            start_group: None,
            splits: HashMap::new(),
        }];

        let roster = transform_entries(&raw, "VL_90", 2024, &course);
        assert_eq!(roster.len(), 1);
        assert!(!roster[0].is_finisher());
        assert!(roster[0].checkpoints.is_empty());
    }

    #[test]
    fn test_raw_entry_lenient_deserialization() {
        let json = r#"{"bib_number": "417", "splits": {"Finish": {"time": 18000}}}"#;
        let entry: RawEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.age_class, None);
        assert_eq!(entry.splits["Finish"].time, 18000.0);
    }
}
