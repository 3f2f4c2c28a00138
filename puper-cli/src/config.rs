//! Layered configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. The config file: `--config <path>`, or `<config dir>/puper/config.toml`
//!    if it exists
//! 3. `PUPER_*` environment variables (`PUPER_WAIT=3`, `PUPER_FETCHER=http`)
//!
//! Command-line flags are applied on top by [`crate::cli::Cli::apply`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use puper_browser::{DEFAULT_FIREFOX_BINARY, Fetcher, LoadOptions};
use puper_display::FormattingPolicy;
use puper_display::markdown::DEFAULT_REMOVAL;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` names a file that does not exist.
    #[error("config file {} does not exist", path.display())]
    Missing {
        /// The path given.
        path: PathBuf,
    },

    /// A source could not be read or a value has the wrong type.
    #[error("invalid configuration: {0}")]
    Figment(Box<figment::Error>),
}

/// Everything that can be configured outside the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Firefox executable used to render URLs.
    pub firefox_binary: PathBuf,
    /// Seconds to let a rendered page settle.
    pub wait: u64,
    /// geckodriver port; `0` is random.
    pub port: u16,
    /// How URLs are fetched.
    pub fetcher: Fetcher,
    /// Document charset label; sniffed when unset.
    pub charset: Option<String>,
    /// Drop attributes other than `href` and `id`.
    pub remove_attributes: bool,
    /// Unwrap `<span>` elements.
    pub remove_span: bool,
    /// Print Markdown instead of markup.
    pub markdown: bool,
    /// Strings stripped from the markup before Markdown conversion.
    pub remove: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            firefox_binary: PathBuf::from(DEFAULT_FIREFOX_BINARY),
            wait: 1,
            port: 0,
            fetcher: Fetcher::default(),
            charset: None,
            remove_attributes: false,
            remove_span: false,
            markdown: false,
            remove: vec![DEFAULT_REMOVAL.to_owned()],
        }
    }
}

impl Settings {
    /// Load settings from every source.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] if `config_file` is given but absent, and
    /// [`ConfigError::Figment`] for unreadable files or mistyped values.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Self = Self::figment(config_file)?
            .extract()
            .map_err(|err| ConfigError::Figment(Box::new(err)))?;
        tracing::debug!(?settings, "configuration loaded");
        Ok(settings)
    }

    /// Build the provider chain without extracting it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] if `config_file` is given but absent.
    pub fn figment(config_file: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Missing {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                if let Some(path) = user_config_path().filter(|path| path.exists()) {
                    tracing::debug!(path = %path.display(), "using user config file");
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        Ok(figment.merge(Env::prefixed("PUPER_")))
    }

    /// The serializer policy these settings describe.
    pub const fn policy(&self) -> FormattingPolicy {
        FormattingPolicy {
            show_attributes: !self.remove_attributes,
            show_inline_span: !self.remove_span,
        }
    }

    /// Acquisition options, waiting for `wait_selector` when rendering.
    pub fn load_options(&self, wait_selector: Option<String>) -> LoadOptions {
        LoadOptions {
            fetcher: self.fetcher,
            firefox_binary: self.firefox_binary.clone(),
            port: self.port,
            wait: Duration::from_secs(self.wait),
            wait_selector,
        }
    }
}

/// `<config dir>/puper/config.toml`
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("puper").join("config.toml"))
}
