//! Course profiles: checkpoint-to-distance tables.
//!
//! Checkpoint names and distances are course data, not logic, so each event is
//! resolved to a profile from a catalog keyed by event-id prefix. Checkpoint
//! names missing from the profile resolve to distance 0 and are excluded from
//! pace analysis downstream.

use serde::{Deserialize, Serialize};

/// Name of the terminal checkpoint in every dataset. Its presence with a
/// positive time is what defines finisher status.
pub const FINISH_CHECKPOINT: &str = "Finish";

/// Name of the start marker checkpoint, at distance 0.
pub const START_CHECKPOINT: &str = "Start";

/// A single timing site along a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointSite {
    /// Checkpoint name as it appears in the dataset
    pub name: String,

    /// Distance from the start in kilometers
    pub distance_km: f64,
}

/// A course: an ordered set of timing sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProfile {
    /// Event-id prefix this profile applies to (e.g. "VL_90")
    pub event_prefix: String,

    /// Human-readable course name
    pub name: String,

    /// Timing sites in race order
    pub checkpoints: Vec<CheckpointSite>,
}

impl CourseProfile {
    /// The classic Vasaloppet 90 km course.
    pub fn vasaloppet_90() -> Self {
        let sites = [
            ("Högsta punkten", 3.0),
            ("Smågan", 11.0),
            ("Mångsbodarna", 24.0),
            ("Risberg", 35.0),
            ("Evertsberg", 47.0),
            ("Oxberg", 62.0),
            ("Hökberg", 71.0),
            ("Eldris", 81.0),
            ("Mora Förvarning", 89.0),
            (FINISH_CHECKPOINT, 90.0),
        ];

        Self {
            event_prefix: "VL_".to_string(),
            name: "Vasaloppet 90 km".to_string(),
            checkpoints: sites
                .iter()
                .map(|(name, distance_km)| CheckpointSite {
                    name: (*name).to_string(),
                    distance_km: *distance_km,
                })
                .collect(),
        }
    }

    /// Distance from the start for a checkpoint name, if known.
    pub fn distance_for(&self, name: &str) -> Option<f64> {
        if name == START_CHECKPOINT {
            return Some(0.0);
        }
        self.checkpoints
            .iter()
            .find(|site| site.name == name)
            .map(|site| site.distance_km)
    }

    /// Total course distance: the terminal checkpoint's distance.
    pub fn total_distance_km(&self) -> f64 {
        self.checkpoints
            .iter()
            .map(|site| site.distance_km)
            .fold(0.0, f64::max)
    }
}

/// A catalog of course profiles, matched to events by event-id prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCatalog {
    pub profiles: Vec<CourseProfile>,
}

impl CourseCatalog {
    pub fn new(profiles: Vec<CourseProfile>) -> Self {
        Self { profiles }
    }

    /// Resolve the profile for an event id. Longest matching prefix wins;
    /// events without a matching profile fall back to the first profile.
    pub fn profile_for(&self, event_id: &str) -> Option<&CourseProfile> {
        self.profiles
            .iter()
            .filter(|p| event_id.starts_with(&p.event_prefix))
            .max_by_key(|p| p.event_prefix.len())
            .or_else(|| self.profiles.first())
    }
}

impl Default for CourseCatalog {
    fn default() -> Self {
        Self::new(vec![CourseProfile::vasaloppet_90()])
    }
}
