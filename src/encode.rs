//! Item → visual encoding: color polarity and opacity, size bucket, tooltip.

use serde::{Deserialize, Serialize};

use crate::item::AttentionItem;
use crate::style::StyleContext;

/// Opacity = clamp(base + span * score, 0, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityEncoding {
    pub base: f64,
    pub span: f64,
}

impl Default for OpacityEncoding {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl OpacityEncoding {
    pub const STANDARD: Self = Self { base: 0.2, span: 0.8 };
    pub const SOFT: Self = Self { base: 0.18, span: 0.82 };

    pub fn new(base: f64, span: f64) -> Self {
        Self { base, span }
    }

    /// Parse `"base,span"` (e.g. `"0.18,0.82"`) or a named preset.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "standard" => return Some(Self::STANDARD),
            "soft" => return Some(Self::SOFT),
            _ => {}
        }
        let (base, span) = s.split_once(',')?;
        let base: f64 = base.trim().parse().ok()?;
        let span: f64 = span.trim().parse().ok()?;
        (base.is_finite() && span.is_finite()).then_some(Self { base, span })
    }

    pub fn alpha(&self, score: f64) -> f64 {
        (self.base + self.span * score).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeBucket {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl SizeBucket {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn class_name(self) -> &'static str {
        match self {
            SizeBucket::Small => "size-1",
            SizeBucket::Medium => "size-2",
            SizeBucket::Large => "size-3",
        }
    }
}

/// Biased toward small: only strong scores get the larger cells.
/// Lower bounds are inclusive.
pub fn bucket_size(score: f64) -> SizeBucket {
    if score >= 0.80 {
        SizeBucket::Large
    } else if score >= 0.45 {
        SizeBucket::Medium
    } else {
        SizeBucket::Small
    }
}

/// Cell-local hover data. Field names are the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipPayload {
    pub title: String,
    pub src: String,
    pub s: String,
    pub d: String,
}

impl TooltipPayload {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualCell {
    pub color: String,
    pub size: SizeBucket,
    pub label: String,
    pub tooltip: TooltipPayload,
    pub link_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CellEncoder {
    pub opacity: OpacityEncoding,
    pub style: StyleContext,
}

impl CellEncoder {
    pub fn new(opacity: OpacityEncoding, style: StyleContext) -> Self {
        Self { opacity, style }
    }

    pub fn color_for(&self, item: &AttentionItem) -> String {
        let rgb = if item.delta < 0.0 {
            self.style.negative_rgb()
        } else {
            self.style.positive_rgb()
        };
        format!("rgba({}, {:.2})", rgb, self.opacity.alpha(item.score))
    }

    pub fn encode(&self, item: &AttentionItem) -> VisualCell {
        VisualCell {
            color: self.color_for(item),
            size: bucket_size(item.score),
            label: item.title.clone(),
            tooltip: TooltipPayload {
                title: item.title.clone(),
                src: item.source.clone(),
                s: format!("{:.2}", item.score),
                d: format!("{:.2}", item.delta),
            },
            link_url: item.url.clone().filter(|u| !u.is_empty()),
        }
    }
}
