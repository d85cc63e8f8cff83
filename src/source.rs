use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_ENDPOINT: &str = "https://vvision.onrender.com/api/attention/heatmap";

/// What the endpoint returned, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub items: Vec<Value>,
    /// Epoch seconds.
    pub last_updated: Option<i64>,
}

/// Freshness hints sent as query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchHint {
    /// Number of cells the grid wants (`min`).
    pub min: usize,
    /// Cache-buster, epoch milliseconds (`t`).
    pub t: u64,
}

#[async_trait]
pub trait HeatmapSource: Send + Sync {
    async fn fetch(&self, hint: FetchHint) -> Result<Snapshot, TransportError>;

    /// Where the data comes from, for logs and status text.
    fn describe(&self) -> String;
}

/// Decode a response body. A missing or non-array `items` is zero items;
/// only unparseable JSON is an error.
pub fn parse_body(body: &str) -> Result<Snapshot, TransportError> {
    let mut parsed: Value =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    let items = match parsed.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let last_updated = parsed
        .get("last_updated")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .filter(|&ts| ts > 0);
    Ok(Snapshot { items, last_updated })
}

/// GET against the heatmap endpoint. No retry: the next scheduled cycle is
/// the retry.
pub struct HttpSource {
    client: Client,
    endpoint: Url,
}

impl HttpSource {
    /// `timeout` of `None` leaves the request unbounded, so a hung endpoint
    /// stalls only its own cycle.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint).map_err(|e| TransportError::Endpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, endpoint })
    }

    pub fn request_url(&self, hint: FetchHint) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("min", &hint.min.to_string())
            .append_pair("t", &hint.t.to_string());
        url
    }
}

#[async_trait]
impl HeatmapSource for HttpSource {
    async fn fetch(&self, hint: FetchHint) -> Result<Snapshot, TransportError> {
        let resp = self
            .client
            .get(self.request_url(hint))
            .header("Cache-Control", "no-store")
            .header("Pragma", "no-cache")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Ok(Snapshot::default());
        }

        let body = resp.text().await?;
        parse_body(&body)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

/// Serves a fixed result; for offline pages and tests.
#[derive(Debug, Clone)]
pub struct StaticSource {
    result: Result<Snapshot, String>,
}

impl StaticSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { result: Ok(snapshot) }
    }

    pub fn from_json(body: &str) -> Result<Self, TransportError> {
        Ok(Self::new(parse_body(body)?))
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
        }
    }
}

#[async_trait]
impl HeatmapSource for StaticSource {
    async fn fetch(&self, _hint: FetchHint) -> Result<Snapshot, TransportError> {
        self.result.clone().map_err(TransportError::Unavailable)
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Stands in for an `HttpSource` that could not be built, so the widget
/// still mounts and every cycle reports the same failure.
#[derive(Debug, Clone)]
pub struct UnreachableSource {
    endpoint: String,
    reason: String,
}

impl UnreachableSource {
    pub fn new(endpoint: &str, err: &TransportError) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl HeatmapSource for UnreachableSource {
    async fn fetch(&self, _hint: FetchHint) -> Result<Snapshot, TransportError> {
        Err(TransportError::Unavailable(self.reason.clone()))
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
