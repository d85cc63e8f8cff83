//! Fetch result → cells. Pure apart from the placeholder RNG.

use chrono::{Local, TimeZone};
use rand::Rng;
use serde_json::Value;

use crate::encode::{CellEncoder, VisualCell};
use crate::error::TransportError;
use crate::item::normalize;
use crate::placeholder;

pub const PLACEHOLDER_NOTICE: &str = "showing placeholders (no live data yet).";

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedGrid {
    pub cells: Vec<VisualCell>,
    pub live: usize,
    pub placeholders: usize,
}

/// Normalize the first `capacity` raw items, pad the rest with
/// placeholders and encode everything. Always yields exactly `capacity`
/// cells; live items keep their order.
pub fn plan_cells<R: Rng + ?Sized>(
    raw: &[Value],
    capacity: usize,
    encoder: &CellEncoder,
    rng: &mut R,
) -> PlannedGrid {
    let mut items: Vec<_> = raw.iter().take(capacity).map(normalize).collect();
    let live = items.len();
    let placeholders = placeholder::pad_to(&mut items, capacity, rng);
    PlannedGrid {
        cells: items.iter().map(|it| encoder.encode(it)).collect(),
        live,
        placeholders,
    }
}

/// How a cycle's fetch went, as far as the status label cares.
#[derive(Debug)]
pub enum FetchOutcome<'a> {
    Live,
    Empty,
    Failed(&'a TransportError),
}

pub fn status_text(outcome: &FetchOutcome<'_>) -> String {
    match outcome {
        FetchOutcome::Live => String::new(),
        FetchOutcome::Empty => PLACEHOLDER_NOTICE.to_string(),
        FetchOutcome::Failed(err) => format!("unable to load heatmap ({})", err),
    }
}

/// `"as of HH:MM"` in local time. `None` for timestamps chrono can't place.
pub fn as_of_text(epoch_secs: i64) -> Option<String> {
    Local
        .timestamp_opt(epoch_secs, 0)
        .single()
        .map(|t| format!("as of {}", t.format("%H:%M")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::SizeBucket;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_pads_short_input() {
        let mut rng = StdRng::seed_from_u64(11);
        let raw = vec![json!({"score": 0.9, "d1": -0.3, "title": "A"})];
        let plan = plan_cells(&raw, 4, &CellEncoder::default(), &mut rng);
        assert_eq!(plan.cells.len(), 4);
        assert_eq!((plan.live, plan.placeholders), (1, 3));
        assert_eq!(plan.cells[0].size, SizeBucket::Large);
        assert_eq!(plan.cells[0].label, "A");
        assert!(plan.cells[1..].iter().all(|c| c.label.is_empty()));
    }

    #[test]
    fn test_truncates_long_input_in_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let raw: Vec<Value> = (0..10).map(|i| json!({"title": format!("t{}", i)})).collect();
        let plan = plan_cells(&raw, 4, &CellEncoder::default(), &mut rng);
        let labels: Vec<&str> = plan.cells.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["t0", "t1", "t2", "t3"]);
        assert_eq!(plan.placeholders, 0);
    }

    #[test]
    fn test_zero_capacity() {
        let mut rng = StdRng::seed_from_u64(0);
        let plan = plan_cells(&[json!({})], 0, &CellEncoder::default(), &mut rng);
        assert!(plan.cells.is_empty());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(&FetchOutcome::Live), "");
        assert_eq!(status_text(&FetchOutcome::Empty), PLACEHOLDER_NOTICE);
        let err = TransportError::Unavailable("connection refused".into());
        assert_eq!(
            status_text(&FetchOutcome::Failed(&err)),
            "unable to load heatmap (connection refused)"
        );
    }

    #[test]
    fn test_as_of_text_shape() {
        let text = as_of_text(1_700_000_000).unwrap();
        assert!(text.starts_with("as of "));
        assert_eq!(text.len(), "as of HH:MM".len());
    }
}
