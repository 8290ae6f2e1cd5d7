//! # Splitscope
//!
//! A ski race results explorer with checkpoint split analytics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (participants, checkpoints, courses, filters)
//! - **fetch**: Data providers for the static results dataset (HTTP, local dir)
//! - **ingest**: Raw event JSON to participant records
//! - **rank**: Overall and per-checkpoint position assignment
//! - **calculate**: Race statistics and relative split annotation
//! - **cohort**: Comparison group filtering
//! - **compare**: Target-vs-cohort comparison metrics
//! - **store**: Per-event record store with lookup and search
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod cohort;
pub mod compare;
pub mod config;
pub mod fetch;
pub mod ingest;
pub mod models;
pub mod rank;
pub mod store;

pub use models::*;

/// Format elapsed seconds as "HH:MM:SS".
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parse a "HH:MM:SS" or "MM:SS" string into elapsed seconds.
pub fn parse_hms(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut total: u64 = 0;
    for part in &parts {
        let value: u64 = part.parse().ok()?;
        total = total * 60 + value;
    }

    Some(total)
}

/// Format a pace in seconds per kilometer as "M:SS".
pub fn format_pace(seconds_per_km: f64) -> String {
    if !seconds_per_km.is_finite() || seconds_per_km <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds_per_km.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
