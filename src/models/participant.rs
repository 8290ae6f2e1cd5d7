//! Participant result and checkpoint split models.

use serde::{Deserialize, Serialize};

use super::{ParticipantId, RaceOutcome, FINISH_CHECKPOINT};

/// Participant gender, as classified by the race organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Infer gender from a Swedish age-class code. Women's classes are
    /// prefixed with "D" (Damer), everything else counts as men's.
    pub fn from_age_class(age_class: &str) -> Self {
        if age_class.starts_with('D') {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

/// One timed split for one participant at one checkpoint.
///
/// `time_seconds == 0` means the checkpoint was not reached; `position` and
/// the relative fields are assigned by the ranking and statistics passes and
/// stay `None` for unreached checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    /// Checkpoint name
    pub name: String,

    /// Distance from the start in kilometers (0 when the name could not be
    /// resolved against the course profile)
    pub distance_km: f64,

    /// Elapsed seconds from race start, 0 = not reached
    pub time_seconds: u64,

    /// Formatted elapsed time ("HH:MM:SS")
    pub time: String,

    /// 1-based rank among participants who reached this checkpoint
    pub position: Option<u32>,

    /// Seconds behind the fastest time at this checkpoint
    pub relative_to_best: Option<u64>,

    /// Signed seconds vs. the mean time at this checkpoint (negative = faster)
    pub relative_to_average: Option<f64>,
}

impl CheckpointRecord {
    pub fn new(name: String, distance_km: f64, time_seconds: u64) -> Self {
        Self {
            name,
            distance_km,
            time_seconds,
            time: crate::format_hms(time_seconds),
            position: None,
            relative_to_best: None,
            relative_to_average: None,
        }
    }

    /// Whether the participant reached this checkpoint.
    pub fn reached(&self) -> bool {
        self.time_seconds > 0
    }

    /// Elapsed seconds, if the checkpoint was reached.
    pub fn elapsed(&self) -> Option<u64> {
        self.reached().then_some(self.time_seconds)
    }

    /// Pace at this checkpoint in seconds per kilometer. `None` for unreached
    /// checkpoints and unresolved distances.
    pub fn pace(&self) -> Option<f64> {
        if self.reached() && self.distance_km > 0.0 {
            Some(self.time_seconds as f64 / self.distance_km)
        } else {
            None
        }
    }
}

/// One race entrant's result for one event-year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResult {
    /// Stable identifier within the event
    pub id: ParticipantId,

    /// Bib number, if one was assigned
    pub bib_number: Option<String>,

    /// Display name
    pub name: String,

    /// Gender classification
    pub gender: Gender,

    /// Age-class category (e.g. "H21", "D35"), may be empty
    pub category: String,

    /// Start group (e.g. "Elit", "Led 3"), may be empty
    pub start_group: String,

    /// Event this result belongs to
    pub event_id: String,

    /// Event year
    pub year: u16,

    /// Race outcome; serialized as finish seconds with 0 meaning DNF
    #[serde(rename = "finish_time_seconds")]
    pub outcome: RaceOutcome,

    /// Formatted finish time ("HH:MM:SS", "00:00:00" for DNF)
    pub finish_time: String,

    /// 1-based overall rank among finishers; `None` for non-finishers
    pub position: Option<u32>,

    /// Checkpoint splits, sorted by distance from the start
    pub checkpoints: Vec<CheckpointRecord>,
}

impl ParticipantResult {
    /// Create a participant with an auto-generated ID and the given splits.
    /// Checkpoints are sorted by distance; the outcome is derived from the
    /// terminal checkpoint.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bib_number: Option<String>,
        fallback_key: &str,
        gender: Gender,
        category: String,
        start_group: String,
        event_id: String,
        year: u16,
        mut checkpoints: Vec<CheckpointRecord>,
    ) -> Self {
        checkpoints.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        let outcome = checkpoints
            .iter()
            .find(|cp| cp.name == FINISH_CHECKPOINT)
            .and_then(CheckpointRecord::elapsed)
            .map_or(RaceOutcome::DidNotFinish, RaceOutcome::Finished);

        let id_key = bib_number.as_deref().unwrap_or(fallback_key);
        let id = ParticipantId::generate(&[id_key, &year.to_string(), &event_id]);

        let name = match &bib_number {
            Some(bib) => format!("Athlete {}", bib),
            None => "Athlete (no bib)".to_string(),
        };

        Self {
            id,
            bib_number,
            name,
            gender,
            category,
            start_group,
            event_id,
            year,
            outcome,
            finish_time: crate::format_hms(outcome.as_sentinel_seconds()),
            position: None,
            checkpoints,
        }
    }

    /// Whether this participant finished the race.
    pub fn is_finisher(&self) -> bool {
        self.outcome.is_finisher()
    }

    /// Finish time in seconds, if the participant finished.
    pub fn finish_seconds(&self) -> Option<u64> {
        self.outcome.finish_seconds()
    }

    /// The split for a checkpoint name, if present.
    pub fn checkpoint(&self, name: &str) -> Option<&CheckpointRecord> {
        self.checkpoints.iter().find(|cp| cp.name == name)
    }

    /// Mutable split lookup, used by the ranking and annotation passes.
    pub fn checkpoint_mut(&mut self, name: &str) -> Option<&mut CheckpointRecord> {
        self.checkpoints.iter_mut().find(|cp| cp.name == name)
    }

    /// The last checkpoint with a resolved distance, in race order.
    pub fn terminal_checkpoint(&self) -> Option<&CheckpointRecord> {
        self.checkpoints.iter().rev().find(|cp| cp.distance_km > 0.0)
    }

    /// Bib number for display, with a placeholder for unassigned bibs.
    pub fn display_bib(&self) -> &str {
        self.bib_number.as_deref().unwrap_or("?")
    }
}
