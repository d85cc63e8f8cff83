//! The widget instance and its refresh scheduler.
//!
//! One widget owns its configuration, its page mounts and the tooltip
//! controller. Each refresh cycle runs fetch → normalize → capacity → pad →
//! encode → render → rewire. Timer ticks do not wait for each other, so
//! cycles can overlap; every cycle takes a sequence number when it starts,
//! and a cycle that resolves after a newer one has rendered is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::encode::CellEncoder;
use crate::error::{TransportError, WidgetError};
use crate::logging::{self, log, obj, v_str, Domain, Level};
use crate::page::{Page, GRID_ID};
use crate::pipeline::{as_of_text, plan_cells, status_text, FetchOutcome};
use crate::render;
use crate::source::{FetchHint, HeatmapSource, HttpSource, Snapshot, UnreachableSource};
use crate::style::StyleContext;
use crate::tooltip::{PointerEvent, TooltipController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleReport {
    Rendered {
        seq: u64,
        capacity: usize,
        live: usize,
        placeholders: usize,
    },
    /// A newer cycle rendered first; this one's result was thrown away.
    Discarded { seq: u64 },
}

struct View {
    page: Page,
    tooltip: TooltipController,
}

struct Inner {
    config: Config,
    source: Arc<dyn HeatmapSource>,
    view: Mutex<View>,
    next_seq: AtomicU64,
    newest_rendered: AtomicU64,
}

impl Inner {
    fn view(&self) -> MutexGuard<'_, View> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Clone)]
pub struct HeatmapWidget {
    inner: Arc<Inner>,
}

impl HeatmapWidget {
    /// Attach to `page`. Fails, after logging once, when the grid mount is
    /// missing; there is nowhere to show a status message in that case.
    pub fn mount(
        page: Page,
        config: Config,
        source: Arc<dyn HeatmapSource>,
    ) -> Result<Self, WidgetError> {
        if page.grid.is_none() {
            logging::log_mount_error(GRID_ID);
            return Err(WidgetError::Mount {
                id: GRID_ID.to_string(),
            });
        }
        log(
            Level::Info,
            Domain::System,
            "boot",
            obj(&[
                ("source", v_str(&source.describe())),
                ("capacity", v_str(config.capacity.as_str())),
                ("refresh_secs", json!(config.refresh_secs)),
            ]),
        );
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                source,
                view: Mutex::new(View {
                    page,
                    tooltip: TooltipController::new(),
                }),
                next_seq: AtomicU64::new(0),
                newest_rendered: AtomicU64::new(0),
            }),
        })
    }

    /// Mount against the HTTP endpoint named in `config`. An endpoint that
    /// can't be used is not fatal: the widget mounts and each cycle shows
    /// the failure in the status label over a placeholder grid.
    pub fn mount_http(page: Page, config: Config) -> Result<Self, WidgetError> {
        let source: Arc<dyn HeatmapSource> =
            match HttpSource::new(&config.api, config.request_timeout()) {
                Ok(source) => Arc::new(source),
                Err(err) => {
                    logging::log_transport_error(0, &config.api, &err.to_string());
                    Arc::new(UnreachableSource::new(&config.api, &err))
                }
            };
        Self::mount(page, config, source)
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Run one full cycle now.
    pub async fn refresh(&self) -> CycleReport {
        run_cycle(&self.inner).await
    }

    /// Run a cycle immediately and then on every refresh interval until the
    /// returned handle is stopped or dropped.
    #[must_use = "dropping the handle stops the refresh loop"]
    pub fn start(&self) -> RefreshHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let inner = Arc::clone(&self.inner);
        let period = inner.config.refresh_interval();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycles = JoinSet::new();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let inner = Arc::clone(&inner);
                        cycles.spawn(async move { run_cycle(&inner).await });
                    }
                    Some(_) = cycles.join_next(), if !cycles.is_empty() => {}
                    _ = stop_rx.changed() => break,
                }
            }
            // in-flight cycles are aborted when the set drops
            cycles.shutdown().await;
            log(Level::Info, Domain::Schedule, "stopped", obj(&[]));
        });

        RefreshHandle { stop: stop_tx, task }
    }

    /// Forward a pointer event to the tooltip controller.
    pub fn pointer(&self, event: PointerEvent) {
        let mut view = self.inner.view();
        let View { page, tooltip } = &mut *view;
        tooltip.handle(page, event);
    }

    /// Container resize; picked up by the next cycle.
    pub fn set_grid_width(&self, px: f64) {
        self.inner.view().page.grid_width_px = px;
    }

    pub fn set_style(&self, style: StyleContext) {
        self.inner.view().page.style = style;
    }

    pub fn grid_generation(&self) -> u64 {
        self.inner
            .view()
            .page
            .grid
            .as_ref()
            .map(|g| g.generation())
            .unwrap_or(0)
    }

    pub fn with_page<R>(&self, f: impl FnOnce(&Page) -> R) -> R {
        f(&self.inner.view().page)
    }

    pub fn snapshot_html(&self) -> String {
        self.with_page(Page::to_html)
    }
}

/// Cancels the refresh timer and any cycles still in flight.
pub struct RefreshHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

async fn run_cycle(inner: &Inner) -> CycleReport {
    let seq = inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let hint = {
        let view = inner.view();
        FetchHint {
            min: inner
                .config
                .capacity
                .capacity(&view.page.style, view.page.grid_width_px),
            t: logging::ts_epoch_ms(),
        }
    };
    let fetched = inner.source.fetch(hint).await;
    apply_cycle(inner, seq, fetched)
}

fn apply_cycle(inner: &Inner, seq: u64, fetched: Result<Snapshot, TransportError>) -> CycleReport {
    let mut view = inner.view();

    let newest = inner.newest_rendered.load(Ordering::SeqCst);
    if newest > seq {
        logging::log_stale_discard(seq, newest);
        return CycleReport::Discarded { seq };
    }
    inner.newest_rendered.store(seq, Ordering::SeqCst);

    let View { page, tooltip } = &mut *view;
    let capacity = inner
        .config
        .capacity
        .capacity(&page.style, page.grid_width_px);

    let (raw, last_updated, status) = match &fetched {
        Ok(snapshot) if snapshot.items.is_empty() => {
            (&snapshot.items[..], snapshot.last_updated, status_text(&FetchOutcome::Empty))
        }
        Ok(snapshot) => (&snapshot.items[..], snapshot.last_updated, status_text(&FetchOutcome::Live)),
        Err(err) => {
            logging::log_transport_error(seq, &inner.source.describe(), &err.to_string());
            (&[][..], None, status_text(&FetchOutcome::Failed(err)))
        }
    };

    let encoder = CellEncoder::new(inner.config.opacity, page.style.clone());
    let plan = plan_cells(raw, capacity, &encoder, &mut rand::thread_rng());

    let Some(grid) = page.grid.as_mut() else {
        return CycleReport::Discarded { seq };
    };
    render::render(grid, &plan.cells, capacity);
    page.set_status(&status);
    if let Some(text) = last_updated.and_then(as_of_text) {
        page.set_asof(&text);
    }
    tooltip.attach(page);

    logging::log_cycle(seq, capacity, plan.live, plan.placeholders);
    CycleReport::Rendered {
        seq,
        capacity,
        live: plan.live,
        placeholders: plan.placeholders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn page() -> Page {
        Page::new(StyleContext::from_pairs(&[("--cols", "2")]), 300.0)
    }

    fn fixed_config() -> Config {
        Config {
            capacity: crate::capacity::CapacityStrategy::FixedGrid,
            ..Config::default()
        }
    }

    #[test]
    fn test_mount_requires_grid() {
        let source = Arc::new(StaticSource::new(Snapshot::default()));
        let err = HeatmapWidget::mount(page().without_grid(), fixed_config(), source)
            .err()
            .unwrap();
        assert!(matches!(err, WidgetError::Mount { ref id } if id == GRID_ID));
    }

    #[tokio::test]
    async fn test_refresh_renders_capacity() {
        let source = Arc::new(StaticSource::from_json(r#"{"items":[{"score":0.9,"title":"A"}]}"#).unwrap());
        let widget = HeatmapWidget::mount(page(), fixed_config(), source).unwrap();
        let report = widget.refresh().await;
        assert_eq!(
            report,
            CycleReport::Rendered { seq: 1, capacity: 4, live: 1, placeholders: 3 }
        );
        widget.with_page(|p| {
            assert_eq!(p.grid.as_ref().unwrap().len(), 4);
            assert_eq!(p.status_text(), Some(""));
        });
    }

    #[tokio::test]
    async fn test_bad_endpoint_still_renders_placeholders() {
        let cfg = Config {
            api: "vvision.onrender.com/api/attention/heatmap".to_string(),
            ..fixed_config()
        };
        let widget = HeatmapWidget::mount_http(page(), cfg).unwrap();
        for _ in 0..2 {
            let report = widget.refresh().await;
            assert!(matches!(report, CycleReport::Rendered { live: 0, placeholders: 4, .. }));
        }
        widget.with_page(|p| {
            assert_eq!(p.grid.as_ref().unwrap().len(), 4);
            let status = p.status_text().unwrap();
            assert!(status.starts_with("unable to load heatmap (invalid endpoint"), "{}", status);
        });
    }

    #[tokio::test]
    async fn test_restyle_applies_on_next_cycle() {
        let source = Arc::new(StaticSource::from_json(r#"{"items":[{"score":1,"d1":1}]}"#).unwrap());
        let widget = HeatmapWidget::mount(page(), fixed_config(), source).unwrap();
        widget.refresh().await;
        widget.set_style(StyleContext::from_pairs(&[("--cols", "3"), ("--green", "1,2,3")]));
        assert!(matches!(widget.refresh().await, CycleReport::Rendered { capacity: 9, .. }));
        widget.with_page(|p| {
            let first = p.grid.as_ref().unwrap().cell(0).unwrap();
            assert_eq!(first.style_value("background"), Some("rgba(1,2,3, 1.00)"));
        });
    }

    #[test]
    fn test_older_cycle_is_discarded_after_newer_render() {
        let source = Arc::new(StaticSource::new(Snapshot::default()));
        let widget = HeatmapWidget::mount(page(), fixed_config(), source).unwrap();
        let inner = &widget.inner;
        assert!(matches!(apply_cycle(inner, 2, Ok(Snapshot::default())), CycleReport::Rendered { .. }));
        assert_eq!(apply_cycle(inner, 1, Ok(Snapshot::default())), CycleReport::Discarded { seq: 1 });
        assert_eq!(widget.grid_generation(), 1);
    }
}
