//! Document acquisition for puper.
//!
//! # Scope
//!
//! This crate provides:
//! - **Sources** - standard input, a local file, or a URL
//! - **Plain HTTP** - a single blocking GET, no scripts run
//! - **Rendering** - a headless Firefox driven through geckodriver over the
//!   [WebDriver](https://www.w3.org/TR/webdriver2/) protocol, so the page
//!   source includes whatever scripts built
//!
//! Everything here returns raw bytes. Decoding and parsing happen in
//! `puper-html`.
//!
//! # Not Yet Implemented
//!
//! - Browsers other than Firefox
//! - Cookies, authentication, custom headers

pub mod error;
pub mod source;
pub mod webdriver;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

pub use error::LoadError;
pub use source::{Fetcher, Source};
pub use webdriver::Geckodriver;

/// Where Firefox lives when nothing else is configured.
pub const DEFAULT_FIREFOX_BINARY: &str = "/Applications/Firefox.app/Contents/MacOS/firefox";

/// How [`load`] retrieves a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Strategy for URL sources.
    pub fetcher: Fetcher,
    /// Firefox executable handed to geckodriver.
    pub firefox_binary: PathBuf,
    /// geckodriver port; `0` picks a free one.
    pub port: u16,
    /// Time to let a rendered page settle when there is no wait selector.
    pub wait: Duration,
    /// CSS selector that must be present before the page source is read.
    pub wait_selector: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            fetcher: Fetcher::default(),
            firefox_binary: PathBuf::from(DEFAULT_FIREFOX_BINARY),
            port: 0,
            wait: Duration::from_secs(1),
            wait_selector: None,
        }
    }
}

/// Read the raw bytes of `source`.
///
/// # Errors
///
/// Returns a [`LoadError`] describing the first step that failed: reading
/// stdin or the file, the HTTP request, or any part of the browser session.
pub fn load(source: &Source, options: &LoadOptions) -> Result<Vec<u8>, LoadError> {
    tracing::debug!(%source, fetcher = %options.fetcher, "loading document");

    let bytes = match source {
        Source::Stdin => {
            let mut bytes = Vec::new();
            let _ = io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .map_err(|source| LoadError::io("failed to read standard input", source))?;
            bytes
        }
        Source::File(path) => fs::read(path)
            .map_err(|source| LoadError::io(format!("failed to read {}", path.display()), source))?,
        Source::Url(url) => match options.fetcher {
            Fetcher::Http => puper_common::fetch_bytes(url)?,
            Fetcher::Render => Geckodriver::new(&options.firefox_binary)
                .port(options.port)
                .wait(options.wait)
                .wait_selector(options.wait_selector.clone())
                .page_source(url)?
                .into_bytes(),
        },
    };

    tracing::debug!(bytes = bytes.len(), "document loaded");
    Ok(bytes)
}
