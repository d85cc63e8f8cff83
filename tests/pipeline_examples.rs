//! End-to-end cycles against fixed sources: the grid is always full, live
//! items come first in order, and the status label tells which case ran.

use std::sync::Arc;

use attention_heatmap::capacity::CapacityStrategy;
use attention_heatmap::encode::TooltipPayload;
use attention_heatmap::page::Element;
use attention_heatmap::pipeline::PLACEHOLDER_NOTICE;
use attention_heatmap::render::TIP_ATTR;
use attention_heatmap::source::{Snapshot, StaticSource};
use attention_heatmap::style::StyleContext;
use attention_heatmap::{Config, CycleReport, HeatmapWidget, Page};
use serde_json::json;

const RED: &str = "220,50,50";
const GREEN: &str = "40,170,90";

/// Fixed 2x2 grid.
fn widget(source: StaticSource) -> HeatmapWidget {
    let style = StyleContext::from_pairs(&[("--red", RED), ("--green", GREEN), ("--cols", "2")]);
    let cfg = Config {
        capacity: CapacityStrategy::FixedGrid,
        ..Config::default()
    };
    HeatmapWidget::mount(Page::new(style, 400.0), cfg, Arc::new(source)).unwrap()
}

fn cells(w: &HeatmapWidget) -> Vec<Element> {
    w.with_page(|p| p.grid.as_ref().unwrap().cells().to_vec())
}

fn payload(el: &Element) -> TooltipPayload {
    TooltipPayload::parse(el.attr(TIP_ATTR).unwrap()).unwrap()
}

#[tokio::test]
async fn single_item_is_padded_to_capacity() {
    let src = StaticSource::from_json(
        r#"{"items":[{"score":0.9,"d1":-0.3,"title":"A"}],"last_updated":1700000000}"#,
    )
    .unwrap();
    let w = widget(src);
    let report = w.refresh().await;
    assert!(matches!(
        report,
        CycleReport::Rendered { capacity: 4, live: 1, placeholders: 3, .. }
    ));

    let cells = cells(&w);
    assert_eq!(cells.len(), 4);
    let first = &cells[0];
    assert!(first.has_class("size-3"));
    assert!(first.style_value("background").unwrap().starts_with(&format!("rgba({}", RED)));
    assert_eq!(first.children[0].text, "A");
    assert_eq!(payload(first).title, "A");
    for placeholder in &cells[1..] {
        let tip = payload(placeholder);
        assert!(tip.title.is_empty() && tip.src.is_empty());
        assert_eq!(placeholder.tag, "div");
    }

    w.with_page(|p| {
        assert_eq!(p.status_text(), Some(""));
        assert!(p.asof_text().unwrap().starts_with("as of "));
    });
}

#[tokio::test]
async fn transport_failure_still_fills_grid() {
    let w = widget(StaticSource::failing("connection refused"));
    w.refresh().await;
    assert_eq!(cells(&w).len(), 4);
    w.with_page(|p| {
        let status = p.status_text().unwrap();
        assert!(status.contains("unable to load heatmap"), "{}", status);
        assert!(status.contains("connection refused"));
        assert_eq!(p.asof_text(), Some(""));
    });
}

#[tokio::test]
async fn empty_items_show_placeholder_notice() {
    let w = widget(StaticSource::from_json(r#"{"items":[]}"#).unwrap());
    let report = w.refresh().await;
    assert!(matches!(report, CycleReport::Rendered { live: 0, placeholders: 4, .. }));
    assert_eq!(cells(&w).len(), 4);
    w.with_page(|p| assert_eq!(p.status_text(), Some(PLACEHOLDER_NOTICE)));
}

#[tokio::test]
async fn surplus_items_are_truncated_in_order() {
    let items: Vec<_> = (0..9)
        .map(|i| json!({"score": 0.1, "name": format!("n{}", i), "source": "demo"}))
        .collect();
    let w = widget(StaticSource::new(Snapshot { items, last_updated: None }));
    w.refresh().await;
    let titles: Vec<String> = cells(&w).iter().map(|c| payload(c).title).collect();
    assert_eq!(titles, vec!["n0", "n1", "n2", "n3"]);
}

#[tokio::test]
async fn link_cells_only_for_urls() {
    let src = StaticSource::from_json(
        r#"{"items":[{"score":0.5,"url":"https://news.test/1"},{"score":0.5,"url":""},{"score":0.5,"url":null}]}"#,
    )
    .unwrap();
    let w = widget(src);
    w.refresh().await;
    let tags: Vec<String> = cells(&w).iter().map(|c| c.tag.clone()).collect();
    assert_eq!(tags, vec!["a", "div", "div", "div"]);
}

#[tokio::test]
async fn status_clears_after_recovery() {
    let failing = widget(StaticSource::failing("down"));
    failing.refresh().await;
    assert!(failing.with_page(|p| p.status_text().unwrap().starts_with("unable")));

    // same page, now a live source
    let page = failing.with_page(|p| p.clone());
    let cfg = failing.config().clone();
    let live = HeatmapWidget::mount(
        page,
        cfg,
        Arc::new(StaticSource::from_json(r#"{"items":[{"score":1}]}"#).unwrap()),
    )
    .unwrap();
    live.refresh().await;
    live.with_page(|p| assert_eq!(p.status_text(), Some("")));
}
