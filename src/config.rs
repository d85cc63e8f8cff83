use std::collections::HashMap;
use std::time::Duration;

use crate::capacity::CapacityStrategy;
use crate::encode::OpacityEncoding;
use crate::source::DEFAULT_ENDPOINT;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api: String,
    pub refresh_secs: u64,
    /// `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
    pub capacity: CapacityStrategy,
    pub opacity: OpacityEncoding,
    /// Grid container width when the host doesn't report one.
    pub grid_width_px: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: DEFAULT_ENDPOINT.to_string(),
            refresh_secs: 60,
            request_timeout_secs: None,
            capacity: CapacityStrategy::DensityFill,
            opacity: OpacityEncoding::STANDARD,
            grid_width_px: 352.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Page bootstrap attributes (`data-api`, `data-refresh-secs`, ...).
    /// Keys may be given with or without the `data-` prefix.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Self {
        let get = |name: &str| {
            attrs
                .get(&format!("data-{}", name))
                .or_else(|| attrs.get(name))
                .cloned()
        };
        let d = Self::default();
        Self {
            api: get("api").filter(|v| !v.trim().is_empty()).unwrap_or(d.api),
            refresh_secs: get("refresh-secs").and_then(|v| v.parse::<u64>().ok()).filter(|&s| s > 0).unwrap_or(d.refresh_secs),
            request_timeout_secs: get("timeout-secs").and_then(|v| v.parse::<u64>().ok()).filter(|&s| s > 0),
            capacity: get("capacity").and_then(|v| CapacityStrategy::parse(&v)).unwrap_or(d.capacity),
            opacity: get("opacity").and_then(|v| OpacityEncoding::parse(&v)).unwrap_or(d.opacity),
            grid_width_px: get("width").and_then(|v| v.parse().ok()).unwrap_or(d.grid_width_px),
        }
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            api: get("HEATMAP_API").filter(|v| !v.trim().is_empty()).unwrap_or(d.api),
            refresh_secs: get("HEATMAP_REFRESH_SECS").and_then(|v| v.parse::<u64>().ok()).filter(|&s| s > 0).unwrap_or(d.refresh_secs),
            request_timeout_secs: get("HEATMAP_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()).filter(|&s| s > 0),
            capacity: get("HEATMAP_CAPACITY").and_then(|v| CapacityStrategy::parse(&v)).unwrap_or(d.capacity),
            opacity: get("HEATMAP_OPACITY").and_then(|v| OpacityEncoding::parse(&v)).unwrap_or(d.opacity),
            grid_width_px: get("HEATMAP_WIDTH_PX").and_then(|v| v.parse().ok()).unwrap_or(d.grid_width_px),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
