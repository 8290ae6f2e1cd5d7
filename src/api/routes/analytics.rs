//! Race statistics and cohort comparison endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::cohort::filter_cohort;
use crate::compare::{checkpoint_pace_samples, compare, CheckpointPaceSample, ComparisonReport};
use crate::models::{FilterSpec, GenderFilter, RaceStatistics};
use crate::store::EventKey;

// ── Statistics ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub year: u16,
    pub event_id: String,
    pub participants: u32,

    #[serde(flatten)]
    pub statistics: RaceStatistics,
}

/// Aggregate statistics for one event.
pub async fn statistics(
    State(state): State<AppState>,
    Path((year, event)): Path<(u16, String)>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let store = state.store_for(EventKey::new(year, event.clone())).await?;

    Ok(Json(StatisticsResponse {
        year,
        event_id: event,
        participants: store.len() as u32,
        statistics: store.statistics().clone(),
    }))
}

// ── Comparison ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ComparisonParams {
    /// "male", "female", or "any" (default)
    pub gender: Option<GenderFilter>,

    /// Comma-separated start group names
    pub start_groups: Option<String>,

    /// Comma-separated age category names
    pub age_groups: Option<String>,

    /// Defaults to true: compare against finishers
    pub finishers_only: Option<bool>,
}

impl ComparisonParams {
    fn into_spec(self) -> FilterSpec {
        let split = |s: Option<String>| {
            s.map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
        };

        FilterSpec::unrestricted()
            .with_gender(self.gender.unwrap_or_default())
            .with_start_groups(split(self.start_groups))
            .with_age_groups(split(self.age_groups))
            .finishers_only(self.finishers_only.unwrap_or(true))
    }
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub bib_number: String,
    pub filters: FilterSpec,

    #[serde(flatten)]
    pub report: ComparisonReport,

    /// Cohort pace distributions per checkpoint, distance order
    pub pace_by_checkpoint: Vec<CheckpointPaceSample>,

    /// Filter values available for this event
    pub available_start_groups: Vec<String>,
    pub available_age_groups: Vec<String>,
}

/// Compare one participant against a filtered cohort.
///
/// An empty cohort is a valid response: the report's metrics come back null
/// and the pace list empty.
pub async fn comparison(
    State(state): State<AppState>,
    Path((year, event, bib)): Path<(u16, String, String)>,
    Query(params): Query<ComparisonParams>,
) -> Result<Json<ComparisonResponse>, ApiError> {
    let store = state.store_for(EventKey::new(year, event)).await?;

    let target = store
        .participant_by_bib(&bib)
        .ok_or_else(|| ApiError::NotFound(format!("bib {}", bib)))?;

    let spec = params.into_spec();
    let cohort = filter_cohort(store.participants(), &target.id, &spec);

    let report = compare(target, &cohort);
    let pace_by_checkpoint = checkpoint_pace_samples(target, &cohort);

    Ok(Json(ComparisonResponse {
        bib_number: bib,
        filters: spec,
        report,
        pace_by_checkpoint,
        available_start_groups: store.start_groups(),
        available_age_groups: store.age_categories(),
    }))
}
