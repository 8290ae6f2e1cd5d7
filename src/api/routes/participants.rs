//! Participant lookup, search, and top-list endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::cohort::filter_cohort;
use crate::compare::{compare, ComparisonReport};
use crate::models::{FilterSpec, Gender, ParticipantResult};
use crate::store::EventKey;

/// One row in a participant listing.
#[derive(Debug, Serialize)]
pub struct ParticipantSummary {
    pub id: String,
    pub bib_number: Option<String>,
    pub name: String,
    pub gender: Gender,
    pub category: String,
    pub start_group: String,
    pub position: Option<u32>,
    pub finish_time_seconds: u64,
    pub finish_time: String,
}

impl ParticipantSummary {
    fn from_participant(p: &ParticipantResult) -> Self {
        Self {
            id: p.id.to_string(),
            bib_number: p.bib_number.clone(),
            name: p.name.clone(),
            gender: p.gender,
            category: p.category.clone(),
            start_group: p.start_group.clone(),
            position: p.position,
            finish_time_seconds: p.outcome.as_sentinel_seconds(),
            finish_time: p.finish_time.clone(),
        }
    }
}

// ── Listing / search ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub participants: Vec<ParticipantSummary>,
    pub pagination: PaginationMeta,
}

/// List the roster, optionally narrowed by a search query, ordered by overall
/// position with non-finishers last.
pub async fn list_participants(
    State(state): State<AppState>,
    Path((year, event)): Path<(u16, String)>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let store = state.store_for(EventKey::new(year, event)).await?;

    let mut matched: Vec<&ParticipantResult> = match params.search.as_deref() {
        Some(query) => store.search(query),
        None => store.participants().iter().collect(),
    };
    matched.sort_by_key(|p| (p.position.is_none(), p.position));

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, matched.len() as u32);

    let participants = matched
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.page_size as usize)
        .map(ParticipantSummary::from_participant)
        .collect();

    Ok(Json(ListResponse {
        participants,
        pagination: meta,
    }))
}

// ── Detail ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    #[serde(flatten)]
    pub participant: ParticipantResult,

    /// Comparison against the whole field (everyone else in the event)
    pub field_comparison: ComparisonReport,
}

/// A single participant with annotated splits and a comparison against the
/// full field.
pub async fn participant_detail(
    State(state): State<AppState>,
    Path((year, event, bib)): Path<(u16, String, String)>,
) -> Result<Json<DetailResponse>, ApiError> {
    let store = state.store_for(EventKey::new(year, event)).await?;

    let participant = store
        .participant_by_bib(&bib)
        .ok_or_else(|| ApiError::NotFound(format!("bib {}", bib)))?;

    let field = filter_cohort(
        store.participants(),
        &participant.id,
        &FilterSpec::unrestricted(),
    );
    let field_comparison = compare(participant, &field);

    Ok(Json(DetailResponse {
        participant: participant.clone(),
        field_comparison,
    }))
}

// ── Top finishers ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub count: Option<usize>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Serialize)]
pub struct TopResponse {
    pub participants: Vec<ParticipantSummary>,
}

/// The top finishers, optionally for one gender (positions renumbered within
/// the gender slice).
pub async fn top_finishers(
    State(state): State<AppState>,
    Path((year, event)): Path<(u16, String)>,
    Query(params): Query<TopParams>,
) -> Result<Json<TopResponse>, ApiError> {
    let store = state.store_for(EventKey::new(year, event)).await?;

    let count = params.count.unwrap_or(10).clamp(1, 100);
    let participants = store
        .top_finishers(count, params.gender)
        .iter()
        .map(ParticipantSummary::from_participant)
        .collect();

    Ok(Json(TopResponse { participants }))
}
