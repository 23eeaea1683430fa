use crate::domain::signal::SignalRecord;
use crate::time::iso_utc;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output of the most recent scan cycle. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct ScanSnapshot {
    pub last_run: Option<DateTime<Utc>>,
    pub results: Vec<SignalRecord>,
}

impl ScanSnapshot {
    pub fn new(last_run: DateTime<Utc>, results: Vec<SignalRecord>) -> Self {
        Self {
            last_run: Some(last_run),
            results,
        }
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary {
            status: "ok",
            last_run: self.last_run.map(iso_utc),
            found_count: self.results.len(),
        }
    }

    pub fn listing(&self) -> ResultsListing {
        ResultsListing {
            last_run: self.last_run.map(iso_utc),
            results: self.results.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub status: &'static str,
    pub last_run: Option<String>,
    pub found_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsListing {
    pub last_run: Option<String>,
    pub results: Vec<SignalRecord>,
}
