use thiserror::Error;

/// Failure to get a usable response out of the endpoint.
///
/// A non-OK status is deliberately not here: the source maps it to an empty
/// snapshot, and the next scheduled cycle retries.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid endpoint {endpoint}: {reason}")]
    Endpoint { endpoint: String, reason: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("mount point '{id}' not found")]
    Mount { id: String },
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
}
