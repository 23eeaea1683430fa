use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One candidate "Strong Buy" row scraped from the screener page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    pub change_24h: String,
    pub volume_24h: String,
    /// Flattened row text, pipe-delimited between text segments.
    pub context: String,
}

impl SignalRecord {
    /// Identity used to drop repeated rows within one extraction pass.
    pub fn dedup_key(&self) -> String {
        if self.symbol.is_empty() {
            self.context.chars().take(30).collect()
        } else {
            self.symbol.clone()
        }
    }
}

/// `SYMBOL|YYYY-MM-DD`: "this symbol was already announced on this UTC day".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationKey(String);

impl NotificationKey {
    pub fn new(symbol: &str, day: NaiveDate) -> Self {
        Self(format!("{symbol}|{}", day.format("%Y-%m-%d")))
    }

    pub fn for_record(record: &SignalRecord, day: NaiveDate) -> Self {
        Self::new(&record.symbol, day)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
