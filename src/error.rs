use thiserror::Error;

/// Errors from the directory API client layer.
///
/// Callers above the client (cascade controller, lookup service) collapse all
/// of these into either an empty option list or the generic lookup error
/// placeholder; the variants exist so the client layer can log what actually
/// happened before the collapse.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or undecodable response body.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the proxy.
    #[error("unexpected http status {0}")]
    Status(reqwest::StatusCode),

    /// The `/ifsc/<code>` endpoint answered with an error payload instead of
    /// a record.
    #[error("no record found for code {0}")]
    NotFound(String),
}
