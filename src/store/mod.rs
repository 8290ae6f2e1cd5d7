//! Per-event record store.
//!
//! Holds the immutable, fully-derived roster for one loaded event: positions
//! and relative splits are computed once at build time and never patched
//! afterwards. Switching events means building a fresh store and discarding
//! the old one wholesale.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fetch::{DataProvider, ProviderError};
use crate::models::{CourseCatalog, Gender, ParticipantId, ParticipantResult, RaceStatistics};
use crate::{calculate, ingest, rank};

/// Identifies one event-year's dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    pub year: u16,
    pub event_id: String,
}

impl EventKey {
    pub fn new(year: u16, event_id: impl Into<String>) -> Self {
        Self {
            year,
            event_id: event_id.into(),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.event_id)
    }
}

/// The loaded, ranked, annotated roster for one event.
pub struct RecordStore {
    key: EventKey,
    participants: Vec<ParticipantResult>,
    statistics: RaceStatistics,
    by_bib: HashMap<String, usize>,
    by_id: HashMap<ParticipantId, usize>,
    loaded_at: DateTime<Utc>,
}

impl RecordStore {
    /// Build a store from a raw roster: assigns positions, computes
    /// statistics, annotates splits, and indexes lookups.
    pub fn build(key: EventKey, mut participants: Vec<ParticipantResult>) -> Self {
        rank::assign_positions(&mut participants);
        let statistics = calculate::summarize(&mut participants);

        let mut by_bib = HashMap::new();
        let mut by_id = HashMap::new();
        for (index, p) in participants.iter().enumerate() {
            if let Some(bib) = &p.bib_number {
                by_bib.entry(bib.clone()).or_insert(index);
            }
            by_id.insert(p.id.clone(), index);
        }

        info!(
            event = %key,
            participants = participants.len(),
            finishers = statistics.total_finishers,
            "record store built"
        );

        Self {
            key,
            participants,
            statistics,
            by_bib,
            by_id,
            loaded_at: Utc::now(),
        }
    }

    /// Fetch, ingest, and build the store for one event.
    pub async fn load(
        provider: &dyn DataProvider,
        catalog: &CourseCatalog,
        key: EventKey,
    ) -> Result<Self, ProviderError> {
        let entries = provider.fetch_event(&key).await?;

        let roster = match catalog.profile_for(&key.event_id) {
            Some(course) => ingest::transform_entries(&entries, &key.event_id, key.year, course),
            None => Vec::new(),
        };

        Ok(Self::build(key, roster))
    }

    pub fn key(&self) -> &EventKey {
        &self.key
    }

    pub fn participants(&self) -> &[ParticipantResult] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn statistics(&self) -> &RaceStatistics {
        &self.statistics
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Look up a participant by bib number.
    pub fn participant_by_bib(&self, bib: &str) -> Option<&ParticipantResult> {
        self.by_bib.get(bib).map(|&index| &self.participants[index])
    }

    /// Look up a participant by ID.
    pub fn participant_by_id(&self, id: &ParticipantId) -> Option<&ParticipantResult> {
        self.by_id.get(id).map(|&index| &self.participants[index])
    }

    /// Search by name substring or exact bib number, case-insensitive.
    pub fn search(&self, query: &str) -> Vec<&ParticipantResult> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.participants
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.bib_number
                        .as_deref()
                        .is_some_and(|bib| bib.to_lowercase() == query)
            })
            .collect()
    }

    /// The top finishers, optionally restricted to one gender. Within a
    /// gender slice, positions are renumbered 1..=N so the slice reads as its
    /// own ranking.
    pub fn top_finishers(&self, count: usize, gender: Option<Gender>) -> Vec<ParticipantResult> {
        let mut finishers: Vec<&ParticipantResult> = self
            .participants
            .iter()
            .filter(|p| p.is_finisher())
            .collect();
        finishers.sort_by_key(|p| p.position);

        match gender {
            None => finishers.into_iter().take(count).cloned().collect(),
            Some(gender) => finishers
                .into_iter()
                .filter(|p| p.gender == gender)
                .take(count)
                .enumerate()
                .map(|(index, p)| {
                    let mut p = p.clone();
                    p.position = Some(index as u32 + 1);
                    p
                })
                .collect(),
        }
    }

    /// Number of finishers.
    pub fn finisher_count(&self) -> u32 {
        self.statistics.total_finishers
    }

    /// Distinct start groups, ordered numerically where the names carry
    /// numbers ("Led 2" before "Led 10"), alphabetically otherwise.
    pub fn start_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self
            .participants
            .iter()
            .filter(|p| !p.start_group.is_empty())
            .map(|p| p.start_group.clone())
            .collect();
        groups.sort();
        groups.dedup();

        let number = Regex::new(r"\d+").unwrap();
        groups.sort_by_key(|s| {
            let numeric = number
                .find(s)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            (numeric, s.clone())
        });
        groups
    }

    /// Distinct age categories, sorted.
    pub fn age_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .participants
            .iter()
            .filter(|p| !p.category.is_empty())
            .map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{CheckpointRecord, Gender};

    fn participant(
        bib: &str,
        gender: Gender,
        category: &str,
        start_group: &str,
        finish_seconds: u64,
    ) -> ParticipantResult {
        let checkpoints = if finish_seconds > 0 {
            vec![CheckpointRecord::new(
                "Finish".to_string(),
                90.0,
                finish_seconds,
            )]
        } else {
            vec![CheckpointRecord::new("Smågan".to_string(), 11.0, 2500)]
        };
        ParticipantResult::new(
            Some(bib.to_string()),
            "0",
            gender,
            category.to_string(),
            start_group.to_string(),
            "VL_90".to_string(),
            2024,
            checkpoints,
        )
    }

    fn store() -> RecordStore {
        RecordStore::build(
            EventKey::new(2024, "VL_90"),
            vec![
                participant("10", Gender::Male, "H21", "Led 2", 19000),
                participant("11", Gender::Female, "D21", "Elit", 18500),
                participant("12", Gender::Male, "H35", "Led 10", 18000),
                participant("13", Gender::Female, "D35", "Led 2", 0),
            ],
        )
    }

    #[test]
    fn test_build_ranks_and_summarizes() {
        let store = store();

        assert_eq!(store.len(), 4);
        assert_eq!(store.finisher_count(), 3);
        assert_eq!(store.participant_by_bib("12").unwrap().position, Some(1));
        assert_eq!(store.participant_by_bib("13").unwrap().position, None);
        assert!(store.statistics().finish_times.is_some());
    }

    #[test]
    fn test_lookup_by_bib_and_id() {
        let store = store();
        let p = store.participant_by_bib("11").unwrap();
        assert_eq!(store.participant_by_id(&p.id).unwrap().display_bib(), "11");
        assert!(store.participant_by_bib("999").is_none());
    }

    #[test]
    fn test_search_by_bib_and_name() {
        let store = store();

        let by_bib = store.search("11");
        assert_eq!(by_bib.len(), 1);
        assert_eq!(by_bib[0].display_bib(), "11");

        // All synthesized names contain "athlete".
        assert_eq!(store.search("athlete").len(), 4);
        assert!(store.search("").is_empty());
        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn test_top_finishers_overall() {
        let store = store();
        let top = store.top_finishers(2, None);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].display_bib(), "12");
        assert_eq!(top[1].display_bib(), "11");
    }

    #[test]
    fn test_top_finishers_by_gender_renumbers() {
        let store = store();
        let women = store.top_finishers(10, Some(Gender::Female));

        assert_eq!(women.len(), 1);
        assert_eq!(women[0].display_bib(), "11");
        // Position renumbered within the gender slice, 2nd overall.
        assert_eq!(women[0].position, Some(1));

        // The stored roster keeps its overall positions.
        assert_eq!(store.participant_by_bib("11").unwrap().position, Some(2));
    }

    #[test]
    fn test_start_groups_numeric_order() {
        let store = store();
        assert_eq!(store.start_groups(), vec!["Elit", "Led 2", "Led 10"]);
    }

    #[test]
    fn test_age_categories_sorted() {
        let store = store();
        assert_eq!(store.age_categories(), vec!["D21", "D35", "H21", "H35"]);
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::build(EventKey::new(2024, "VL_90"), vec![]);

        assert!(store.is_empty());
        assert_eq!(store.finisher_count(), 0);
        assert!(store.top_finishers(10, None).is_empty());
        assert!(store.start_groups().is_empty());
        assert_eq!(store.statistics().finish_times, None);
    }

    #[test]
    fn test_event_key_display() {
        assert_eq!(EventKey::new(2024, "VL_90").to_string(), "2024/VL_90");
    }
}
