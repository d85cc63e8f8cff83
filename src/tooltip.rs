//! Hover tooltip: a two-state machine driven by pointer events on grid cells.

use crate::encode::TooltipPayload;
use crate::logging::{log, obj, Domain, Level};
use crate::page::{Element, Page};
use crate::render::TIP_ATTR;
use serde_json::json;

/// Offset of the tooltip from the cursor, right and down.
pub const POINTER_OFFSET_PX: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible { cell: usize },
}

/// Pointer events addressed to a cell of a given grid generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { generation: u64, cell: usize, x: f64, y: f64 },
    Move { generation: u64, cell: usize, x: f64, y: f64 },
    Leave { generation: u64, cell: usize },
}

impl PointerEvent {
    fn generation(&self) -> u64 {
        match *self {
            PointerEvent::Enter { generation, .. }
            | PointerEvent::Move { generation, .. }
            | PointerEvent::Leave { generation, .. } => generation,
        }
    }
}

#[derive(Debug, Default)]
pub struct TooltipController {
    state: TooltipState,
    bound_generation: Option<u64>,
}

impl TooltipController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TooltipState {
        self.state
    }

    pub fn bound_generation(&self) -> Option<u64> {
        self.bound_generation
    }

    /// Rebind to the grid's current cells after a render. The cell under a
    /// visible tooltip is gone, so the tooltip is hidden.
    pub fn attach(&mut self, page: &mut Page) {
        self.bound_generation = page.grid.as_ref().map(|g| g.generation());
        if let TooltipState::Visible { .. } = self.state {
            hide(page);
        }
        self.state = TooltipState::Hidden;
    }

    pub fn handle(&mut self, page: &mut Page, event: PointerEvent) {
        if Some(event.generation()) != self.bound_generation {
            return;
        }
        match (self.state, event) {
            (_, PointerEvent::Enter { cell, x, y, .. }) => {
                let Some(payload) = payload_for(page, cell) else {
                    return;
                };
                show(page, &payload, x, y);
                self.state = TooltipState::Visible { cell };
                log(
                    Level::Trace,
                    Domain::Tooltip,
                    "show",
                    obj(&[("cell", json!(cell))]),
                );
            }
            (TooltipState::Visible { cell: current }, PointerEvent::Move { cell, x, y, .. })
                if current == cell =>
            {
                position(page, x, y);
            }
            (TooltipState::Visible { cell: current }, PointerEvent::Leave { cell, .. })
                if current == cell =>
            {
                hide(page);
                self.state = TooltipState::Hidden;
            }
            _ => {}
        }
    }
}

fn payload_for(page: &Page, cell: usize) -> Option<TooltipPayload> {
    let raw = page.grid.as_ref()?.cell(cell)?.attr(TIP_ATTR)?;
    TooltipPayload::parse(raw)
}

fn show(page: &mut Page, payload: &TooltipPayload, x: f64, y: f64) {
    let Some(tip) = page.tooltip.as_mut() else {
        return;
    };
    let title = if payload.title.is_empty() { "(placeholder)" } else { payload.title.as_str() };
    let mut lines = vec![Element::new("b").with_text(title)];
    if !payload.src.is_empty() {
        lines.push(Element::new("div").with_class("src").with_text(&payload.src));
    }
    lines.push(
        Element::new("div")
            .with_class("vals")
            .with_text(&format!("score {} · Δ {}", payload.s, payload.d)),
    );
    tip.children = lines;
    tip.set_style("opacity", "1");
    position(page, x, y);
}

fn position(page: &mut Page, x: f64, y: f64) {
    if let Some(tip) = page.tooltip.as_mut() {
        tip.set_style("left", &format!("{}px", x + POINTER_OFFSET_PX));
        tip.set_style("top", &format!("{}px", y + POINTER_OFFSET_PX));
    }
}

fn hide(page: &mut Page) {
    if let Some(tip) = page.tooltip.as_mut() {
        tip.set_style("opacity", "0");
    }
}
