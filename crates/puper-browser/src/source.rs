//! Input sources and URL fetch strategies.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input.
    Stdin,
    /// A local file.
    File(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl Source {
    /// Classify a positional argument: missing or `-` is stdin, an
    /// `http(s)://` prefix is a URL, anything else is a file path.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Stdin,
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Self::Url(url.to_string())
            }
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// How a URL source is retrieved.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Fetcher {
    /// Load the page in headless Firefox and read the rendered source.
    #[default]
    Render,
    /// A single HTTP GET; the raw response body.
    Http,
}
