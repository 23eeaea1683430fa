//! Heuristic "Strong Buy" row extraction from unstructured screener markup.
//!
//! The source page has no stable schema. Rows are found by locating the marker
//! text and climbing to the nearest element that plausibly holds a full row.

pub mod filter;
pub mod patterns;

use crate::domain::signal::SignalRecord;
use scraper::{ElementRef, Html};
use std::collections::HashSet;

pub use filter::filter_strong_buy;

/// Maximum number of parent hops from a marker text node.
const WALK_BUDGET: usize = 5;

const CONTAINER_TAGS: &[&str] = &["tr", "div", "li", "section"];

/// Text under these elements is never rendered.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

const SEGMENT_SEPARATOR: &str = "|";

pub trait SignalExtractor: Send + Sync {
    fn extract(&self, markup: &str) -> Vec<SignalRecord>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl SignalExtractor for HeuristicExtractor {
    fn extract(&self, markup: &str) -> Vec<SignalRecord> {
        extract(markup)
    }
}

pub fn extract(markup: &str) -> Vec<SignalRecord> {
    let document = Html::parse_document(markup);

    let mut candidates = Vec::new();
    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !patterns::has_marker(text) {
            continue;
        }

        // Markers without any enclosing element have nothing to flatten.
        let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if is_hidden(parent) {
            continue;
        }

        let container = if is_unwrapped_row(parent, text) {
            Some(parent)
        } else {
            climb_to_container(parent)
        };
        let Some(container) = container else {
            continue;
        };

        let row = flatten_text(container);
        candidates.push(SignalRecord {
            symbol: patterns::symbol(&row),
            change_24h: patterns::change_24h(&row),
            volume_24h: patterns::volume_24h(&row),
            context: row,
        });
    }

    dedup_first_seen(candidates)
}

/// Climbs from the marker's parent (one hop already spent) until a container tag
/// or the walk budget is reached.
///
/// Returns `None` when the walk passes the document root first. Landing on the
/// document itself with the last hop flattens the outermost element.
fn climb_to_container(start: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut current = start;
    for hop in 1..WALK_BUDGET {
        if CONTAINER_TAGS.contains(&current.value().name()) {
            return Some(current);
        }
        let parent = current.parent()?;
        match ElementRef::wrap(parent) {
            Some(element) => current = element,
            None if hop + 1 == WALK_BUDGET => return Some(current),
            None => return None,
        }
    }
    Some(current)
}

/// Row tags outside a table are dropped by the parser, leaving the row's text
/// directly in `body`. Such a body holds nothing but the marker's own text.
fn is_unwrapped_row(parent: ElementRef<'_>, marker_text: &str) -> bool {
    parent.value().name() == "body" && flatten_text(parent) == marker_text.trim()
}

/// Visible descendant text, one trimmed segment per text node, pipe-joined.
fn flatten_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            if is_hidden(parent) {
                return None;
            }
            let segment = text.trim();
            (!segment.is_empty()).then_some(segment)
        })
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    HIDDEN_TAGS.contains(&element.value().name())
}

fn dedup_first_seen(records: Vec<SignalRecord>) -> Vec<SignalRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_yields_all_fields() {
        let records = extract("<tr>BTC/USDT Strong Buy -2.5% 14.3K</tr>");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "BTC/USDT");
        assert_eq!(records[0].change_24h, "-2.5%");
        assert_eq!(records[0].volume_24h, "14.3K");
        assert!(records[0].context.contains("Strong Buy"));
    }

    #[test]
    fn table_rows_are_flattened_with_pipes() {
        let html = r#"
            <table>
              <tr><td>SOLUSDT</td><td> Strong Buy </td><td>4.1%</td><td>880K</td></tr>
            </table>"#;
        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context, "SOLUSDT|Strong Buy|4.1%|880K");
        assert_eq!(records[0].symbol, "SOLUSDT");
        assert_eq!(records[0].change_24h, "4.1%");
        assert_eq!(records[0].volume_24h, "880K");
    }

    #[test]
    fn duplicate_symbols_keep_first_row() {
        let html = r#"
            <table>
              <tr><td>ETHUSDT</td><td>Strong Buy</td><td>1.5%</td><td>2.1M</td></tr>
              <tr><td>ETHUSDT</td><td>Strong Buy</td><td>3.0%</td><td>9.9M</td></tr>
              <tr><td>XRPUSDT</td><td>Strong Buy</td><td>-0.4%</td><td>700K</td></tr>
            </table>"#;
        let records = extract(html);
        let symbols: Vec<_> = records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["ETHUSDT", "XRPUSDT"]);
        assert_eq!(records[0].change_24h, "1.5%");
        assert_eq!(records[0].volume_24h, "2.1M");
    }

    #[test]
    fn walk_budget_stops_below_distant_container() {
        let html = r#"
            <section>OUTSIDE
              <span><span><span>
                <span><span><b>Strong Buy</b> ABCUSDT</span></span>
              </span></span></span>
            </section>"#;
        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "ABCUSDT");
        assert_eq!(records[0].context, "Strong Buy|ABCUSDT");
        assert!(!records[0].context.contains("OUTSIDE"));
    }

    #[test]
    fn nearest_container_wins_over_outer_ones() {
        let html = r#"
            <div>NOISEUSDT
              <ul><li><span>LINKUSDT</span> <em>strong buy</em> 0.8% 5.5K</li></ul>
            </div>"#;
        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "LINKUSDT");
        assert_eq!(records[0].context, "LINKUSDT|strong buy|0.8% 5.5K");
        assert_eq!(records[0].volume_24h, "5.5K");
    }

    #[test]
    fn marker_without_reachable_container_is_skipped() {
        let html = r#"<html><body>
            <h1>MARKETS</h1>
            <p>Strong Buy</p>
            <span>BTCUSDT 1% 2K</span>
            <footer>ZZZUSDT 9.9B</footer>
        </body></html>"#;
        assert!(extract(html).is_empty());
        assert!(extract("<b>Strong Buy</b> ABCUSDT").is_empty());
        assert!(extract("Strong Buy BTCUSDT <p>1% 2K</p>").is_empty());
    }

    #[test]
    fn last_hop_onto_the_document_flattens_everything() {
        let records = extract("<h2>ABCUSDT</h2><span><b>Strong Buy</b> 3%</span>");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context, "ABCUSDT|Strong Buy|3%");
        assert_eq!(records[0].symbol, "ABCUSDT");
    }

    #[test]
    fn bare_row_fragment_is_its_own_row() {
        let records = extract("<tr>ETHUSDT Strong Buy 1.1% 3M</tr>");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context, "ETHUSDT Strong Buy 1.1% 3M");
    }

    #[test]
    fn no_marker_yields_nothing() {
        assert!(extract("<div>BTCUSDT Buy 1% 2K</div>").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn marker_split_across_elements_is_not_matched() {
        assert!(extract("<div>Strong <b>Buy</b> BTCUSDT</div>").is_empty());
    }

    #[test]
    fn script_and_style_text_is_ignored() {
        let html = r#"
            <div><script>var label = "Strong Buy BTCUSDT";</script></div>
            <div><style>.strong-buy::after { content: "Strong Buy"; }</style></div>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        let records = extract("<<<div>></li></tr>Strong Buy<td 12% <<");
        assert!(records.len() <= 1);
    }

    #[test]
    fn lowercase_row_falls_back_to_first_segment() {
        let records = extract("<li>strong buy on eth</li>");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "strong buy on eth");
        assert_eq!(records[0].change_24h, "");
        assert_eq!(records[0].volume_24h, "");
    }

    #[test]
    fn trait_object_delegates_to_heuristics() {
        let extractor: Box<dyn SignalExtractor> = Box::new(HeuristicExtractor);
        assert_eq!(
            extractor.extract("<tr>BTC/USDT Strong Buy -2.5% 14.3K</tr>"),
            extract("<tr>BTC/USDT Strong Buy -2.5% 14.3K</tr>")
        );
    }
}
