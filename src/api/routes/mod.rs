//! Route handlers.

pub mod analytics;
pub mod events;
pub mod participants;

#[cfg(test)]
pub mod test_support {
    //! Shared fixtures for route tests: a small on-disk dataset served
    //! through the local provider.

    use std::path::Path;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::state::AppState;
    use crate::fetch::LocalDataProvider;
    use crate::models::CourseCatalog;

    /// Write the test dataset: one event with five entrants (four finishers,
    /// one DNF, one unassigned bib).
    pub fn write_fixture(dir: &Path) {
        std::fs::write(
            dir.join("index.json"),
            r#"{"2024": {"VL_90": "Vasaloppet"}}"#,
        )
        .unwrap();

        let events = dir.join("events").join("2024");
        std::fs::create_dir_all(&events).unwrap();
        let entries = r#"[
            {"bib_number": "1", "age_class": "H21", "start_group": "Elit",
             "splits": {"Smågan": {"time": 2100, "pace": 3.2},
                        "Mångsbodarna": {"time": 4700, "pace": 3.3},
                        "Finish": {"time": 18000, "pace": 3.3}}},
            {"bib_number": "2", "age_class": "H21", "start_group": "Elit",
             "splits": {"Smågan": {"time": 2300, "pace": 3.5},
                        "Mångsbodarna": {"time": 5100, "pace": 3.6},
                        "Finish": {"time": 19000, "pace": 3.5}}},
            {"bib_number": "3", "age_class": "D21", "start_group": "Elit",
             "splits": {"Smågan": {"time": 2200, "pace": 3.3},
                        "Finish": {"time": 18500, "pace": 3.4}}},
            {"bib_number": "4", "age_class": "H35", "start_group": "Led 1",
             "splits": {"Smågan": {"time": 2500, "pace": 3.8},
                        "Finish": {"time": 20000, "pace": 3.7}}},
            {"bib_number": "5", "age_class": "D35", "start_group": "Led 1",
             "splits": {"Smågan": {"time": 2600, "pace": 3.9}}},
            {"bib_number": "nan", "age_class": "H40", "start_group": "Led 1",
             "splits": {"Finish": {"time": 21000, "pace": 3.9}}}
        ]"#;
        std::fs::write(events.join("VL_90.json"), entries).unwrap();
    }

    /// State backed by the fixture dataset in `dir`.
    pub fn test_state(dir: &Path) -> AppState {
        write_fixture(dir);
        AppState::new(
            Arc::new(LocalDataProvider::new(dir.to_path_buf())),
            CourseCatalog::default(),
        )
    }

    /// One-shot GET returning (status, parsed body).
    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}
