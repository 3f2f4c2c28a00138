//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use puper_browser::Fetcher;
use puper_select::tokenize;

use crate::config::Settings;

const LONG_ABOUT: &str = "\
Filter or select portions of an HTML document and clean them up by removing
attributes or <span> wrappers. Handy for feeding pages to language models
without the markup noise.

URLs are rendered in headless Firefox through geckodriver, so pages built by
client-side JavaScript work. Each run starts its own geckodriver on a random
free port, so several runs can happen at once.";

/// `puper [INPUT] [OPTIONS]`
#[derive(Debug, Parser)]
#[command(
    name = "puper",
    version,
    about = "Select and clean up HTML read from stdin, a file, or a URL",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    /// File path, http(s) URL, or `-` for stdin (the default)
    pub input: Option<String>,

    /// CSS selector; repeatable. `>`, `+` and `,` may be written inline
    #[arg(short, long = "selector", value_name = "SELECTOR", default_value = "*")]
    pub selectors: Vec<String>,

    /// Character set of the document, e.g. `windows-1252` (sniffed if unset)
    #[arg(short, long)]
    pub charset: Option<String>,

    /// Firefox executable used to render URLs
    #[arg(long, value_name = "PATH")]
    pub firefox_binary: Option<PathBuf>,

    /// Seconds to let a rendered page settle when no selector is given
    #[arg(short, long, value_name = "SECONDS")]
    pub wait: Option<u64>,

    /// geckodriver port (0 picks a random free port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Fetch URLs with a plain HTTP GET instead of rendering them
    #[arg(long)]
    pub http: bool,

    /// Drop every attribute except `href` and `id`
    #[arg(long)]
    pub remove_attributes: bool,

    /// Unwrap `<span>` elements, keeping their content
    #[arg(long)]
    pub remove_span: bool,

    /// Print the selection as Markdown instead of markup
    #[arg(long)]
    pub markdown: bool,

    /// Comma-separated strings to strip before Markdown conversion [default: <<]
    #[arg(long, value_name = "STRINGS", value_delimiter = ',')]
    pub remove: Option<Vec<String>>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: `<config dir>/puper/config.toml`)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The selector arguments split into engine tokens, in order.
    pub fn tokens(&self) -> Vec<String> {
        self.selectors.iter().flat_map(|s| tokenize(s)).collect()
    }

    /// The first selector argument as written, for the renderer to wait on.
    pub fn wait_selector(&self) -> Option<String> {
        self.selectors.first().cloned()
    }

    /// Overlay the flags that were given on top of `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(charset) = &self.charset {
            settings.charset = Some(charset.clone());
        }
        if let Some(binary) = &self.firefox_binary {
            settings.firefox_binary.clone_from(binary);
        }
        if let Some(wait) = self.wait {
            settings.wait = wait;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if self.http {
            settings.fetcher = Fetcher::Http;
        }
        settings.remove_attributes |= self.remove_attributes;
        settings.remove_span |= self.remove_span;
        settings.markdown |= self.markdown;
        if let Some(remove) = &self.remove {
            settings.remove.clone_from(remove);
        }
        settings
    }
}
