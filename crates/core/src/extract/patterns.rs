//! Token grammars used to pull fields out of a flattened screener row.
//!
//! Each grammar is a plain function over the row text so it can be tuned or
//! replaced without touching the container walk or the cycle logic.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MARKER_RE: Regex = Regex::new(r"(?i)strong\s*buy").unwrap();
    static ref SYMBOL_RE: Regex = Regex::new(r"[A-Z0-9_-]{2,20}/?USDT|[A-Z0-9_-]{2,20}").unwrap();
    static ref CHANGE_RE: Regex = Regex::new(r"-?\d{1,3}(?:[.,]\d+)?\s*%").unwrap();
    static ref VOLUME_RE: Regex = Regex::new(r"\d+[.,]?\d*\s*(?:K|M|B)?").unwrap();
}

pub const UNKNOWN_SYMBOL: &str = "unknown";

/// Case-insensitive "Strong Buy" marker, tolerant of missing or repeated whitespace.
pub fn has_marker(text: &str) -> bool {
    MARKER_RE.is_match(text)
}

/// First ticker-looking token (`BTCUSDT`, `BTC/USDT`, `SOL-PERP`), else the first
/// pipe segment, else [`UNKNOWN_SYMBOL`].
pub fn symbol(text: &str) -> String {
    if let Some(m) = SYMBOL_RE.find(text) {
        return m.as_str().to_string();
    }

    match text.split('|').next().map(str::trim) {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => UNKNOWN_SYMBOL.to_string(),
    }
}

/// First percentage token such as `-3.4%` or `12,5 %`; empty when absent.
pub fn change_24h(text: &str) -> String {
    CHANGE_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Last number-like token, with an optional K/M/B magnitude; empty when absent.
///
/// Rows list volume after the change column, so the last match is taken.
/// Whitespace the token grammar absorbs stays in the token.
pub fn volume_24h(text: &str) -> String {
    VOLUME_RE
        .find_iter(text)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_case_and_space_insensitive() {
        assert!(has_marker("Strong Buy"));
        assert!(has_marker("STRONG   BUY"));
        assert!(has_marker("strongbuy"));
        assert!(has_marker("Rating: Strong Buy!"));
        assert!(!has_marker("Strong|Buy"));
        assert!(!has_marker("Buy"));
    }

    #[test]
    fn symbol_prefers_usdt_pairs() {
        assert_eq!(symbol("BTC/USDT Strong Buy"), "BTC/USDT");
        assert_eq!(symbol("ETHUSDT|Strong Buy"), "ETHUSDT");
        assert_eq!(symbol("Strong Buy|SOL-PERP|2.0%"), "SOL-PERP");
    }

    #[test]
    fn symbol_falls_back_to_first_segment_then_unknown() {
        assert_eq!(symbol("strong buy on eth|more"), "strong buy on eth");
        assert_eq!(symbol(""), UNKNOWN_SYMBOL);
        assert_eq!(symbol("|"), UNKNOWN_SYMBOL);
    }

    #[test]
    fn change_takes_first_percentage() {
        assert_eq!(change_24h("BTC -2.5% then 4%"), "-2.5%");
        assert_eq!(change_24h("DOGE|12,75 %|1M"), "12,75 %");
        assert_eq!(change_24h("no percentage here 42"), "");
    }

    #[test]
    fn volume_takes_last_number_like_token() {
        assert_eq!(volume_24h("BTC/USDT Strong Buy -2.5% 14.3K"), "14.3K");
        assert_eq!(volume_24h("ETHUSDT|Strong Buy|1.5%|2.1M"), "2.1M");
        assert_eq!(volume_24h("Strong Buy|1.5%|1200 "), "1200 ");
        assert_eq!(volume_24h("Strong Buy"), "");
    }
}
