use crate::domain::signal::SignalRecord;
use crate::extract::patterns::has_marker;

/// Keeps records whose flattened context still carries the "Strong Buy" marker.
///
/// Order is preserved and surviving records are passed through untouched.
pub fn filter_strong_buy(records: Vec<SignalRecord>) -> Vec<SignalRecord> {
    records
        .into_iter()
        .filter(|r| has_marker(&r.context))
        .collect()
}
