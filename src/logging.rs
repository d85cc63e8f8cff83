//! Structured logging for the heatmap widget.
//!
//! Every record is one JSON line on stderr with a monotonically increasing
//! `seq`, so interleaved refresh cycles can be untangled after the fact.
//! `LOG_LEVEL` sets the floor, `LOG_DOMAINS` (comma-separated or "all")
//! selects categories.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::parse(&v))
            .unwrap_or(Level::Info)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Fetch,    // Endpoint requests and responses
    Render,   // Grid materialization
    Tooltip,  // Hover state
    Schedule, // Refresh timer and cycle ordering
    System,   // Mount, startup, shutdown
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Fetch => "fetch",
            Domain::Render => "render",
            Domain::Tooltip => "tooltip",
            Domain::Schedule => "schedule",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Epoch milliseconds
pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let line = record(level, domain, event, fields);
    let stderr = std::io::stderr();
    let mut w = stderr.lock();
    let _ = writeln!(w, "{}", line);
}

fn record(level: Level, domain: Domain, event: &str, mut fields: Map<String, Value>) -> Value {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry)
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_cycle(seq: u64, capacity: usize, live: usize, placeholders: usize) {
    log(
        Level::Info,
        Domain::Render,
        "cycle_rendered",
        obj(&[
            ("cycle", json!(seq)),
            ("capacity", json!(capacity)),
            ("live", json!(live)),
            ("placeholders", json!(placeholders)),
        ]),
    );
}

pub fn log_stale_discard(seq: u64, newest_rendered: u64) {
    log(
        Level::Warn,
        Domain::Schedule,
        "stale_cycle_discarded",
        obj(&[
            ("cycle", json!(seq)),
            ("newest_rendered", json!(newest_rendered)),
        ]),
    );
}

pub fn log_transport_error(seq: u64, endpoint: &str, err: &str) {
    log(
        Level::Warn,
        Domain::Fetch,
        "transport_error",
        obj(&[
            ("cycle", json!(seq)),
            ("endpoint", v_str(endpoint)),
            ("msg", v_str(err)),
        ]),
    );
}

pub fn log_mount_error(id: &str) {
    log(
        Level::Error,
        Domain::System,
        "mount_missing",
        obj(&[("id", v_str(id)), ("msg", v_str("grid not found"))]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}
