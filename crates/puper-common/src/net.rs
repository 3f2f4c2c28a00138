//! HTTP fetch utilities.
//!
//! Provides the simple blocking HTTP GET used when a page is fetched without
//! rendering it in a browser first.

use std::time::Duration;

use thiserror::Error;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Failure while fetching a URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The client could not be built or the request failed in transit.
    #[error("request to {url} failed: {source}")]
    Request {
        /// The URL being fetched.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("HTTP error fetching {url}: {status}")]
    Status {
        /// The URL being fetched.
        url: String,
        /// The status the server returned.
        status: reqwest::StatusCode,
    },
}

/// Fetch a URL and return its body as raw bytes.
///
/// The body is returned undecoded; charset handling is left to the parser.
///
/// # Errors
///
/// Returns [`FetchError::Request`] if the HTTP client cannot be created, the
/// request fails, or the body cannot be read, and [`FetchError::Status`] if
/// the response has a non-success status.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let request_error = |source: reqwest::Error| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(request_error)?;

    tracing::debug!(url, "fetching page over HTTP");
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(request_error)
}
