//! Event index endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Serialize)]
pub struct EventEntry {
    pub year: String,
    pub event_id: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventEntry>,
}

/// List every available event-year, most recent year first.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<EventsResponse>, ApiError> {
    let index = state.provider.event_index().await?;

    let mut events: Vec<EventEntry> = index
        .iter()
        .flat_map(|(year, entries)| {
            entries.iter().map(move |(event_id, label)| EventEntry {
                year: year.clone(),
                event_id: event_id.clone(),
                label: label.clone(),
            })
        })
        .collect();
    events.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.event_id.cmp(&b.event_id)));

    Ok(Json(EventsResponse { events }))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::{get_json, test_state};
    use crate::api::build_router;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_events() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/events").await;

        assert_eq!(status, StatusCode::OK);
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["year"], "2024");
        assert_eq!(events[0]["event_id"], "VL_90");
        assert_eq!(events[0]["label"], "Vasaloppet");
    }

    #[tokio::test]
    async fn test_list_events_missing_index_is_upstream_error() {
        let tmp = tempfile::tempdir().unwrap();
        // No fixture written: the provider has nothing to read.
        let state = crate::api::state::AppState::new(
            std::sync::Arc::new(crate::fetch::LocalDataProvider::new(tmp.path().to_path_buf())),
            crate::models::CourseCatalog::default(),
        );

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/events").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
    }
}
