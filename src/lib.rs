//! Attention heatmap widget: scored items from a remote endpoint rendered
//! as a dense grid of colored, variably-sized cells with hover tooltips.

pub mod capacity;
pub mod config;
pub mod encode;
pub mod error;
pub mod item;
pub mod logging;
pub mod page;
pub mod pipeline;
pub mod placeholder;
pub mod render;
pub mod source;
pub mod style;
pub mod tooltip;
pub mod widget;

pub use config::Config;
pub use error::{TransportError, WidgetError};
pub use item::AttentionItem;
pub use page::Page;
pub use widget::{CycleReport, HeatmapWidget, RefreshHandle};
