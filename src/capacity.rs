use crate::style::StyleContext;

pub const DEFAULT_COLS: usize = 8;
pub const DEFAULT_UNIT_PX: u32 = 44;
/// Density-fill never goes below a 6x6 grid, however narrow the container.
pub const MIN_DENSITY_COLS: usize = 6;
/// Upper bound on columns for either strategy; keeps `cols²` small enough to
/// allocate every cycle.
pub const MAX_COLS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityStrategy {
    /// `cols²`, `cols` from `--cols`.
    FixedGrid,
    /// `clamp(width / unit, 6, MAX_COLS)²`, `unit` from `--unit`.
    #[default]
    DensityFill,
}

impl CapacityStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fixed-grid" | "cols" => Some(CapacityStrategy::FixedGrid),
            "density" | "density-fill" | "viewport" => Some(CapacityStrategy::DensityFill),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityStrategy::FixedGrid => "fixed",
            CapacityStrategy::DensityFill => "density",
        }
    }

    /// Number of cells for the current style and container width. Call it
    /// on every refresh; the container may have been resized.
    pub fn capacity(&self, style: &StyleContext, container_width_px: f64) -> usize {
        let cols = match self {
            CapacityStrategy::FixedGrid => fixed_cols(style),
            CapacityStrategy::DensityFill => density_cols(style, container_width_px),
        };
        cols * cols
    }
}

fn fixed_cols(style: &StyleContext) -> usize {
    style
        .get_int("--cols")
        .filter(|&c| c > 0)
        .map(|c| c.min(MAX_COLS as i64) as usize)
        .unwrap_or(DEFAULT_COLS)
}

fn density_cols(style: &StyleContext, width: f64) -> usize {
    let unit = style
        .get_int("--unit")
        .filter(|&u| u > 0)
        .map(|u| u as f64)
        .unwrap_or(DEFAULT_UNIT_PX as f64);
    let fit = if width.is_finite() && width > 0.0 {
        (width / unit).floor() as usize
    } else {
        0
    };
    fit.clamp(MIN_DENSITY_COLS, MAX_COLS)
}
