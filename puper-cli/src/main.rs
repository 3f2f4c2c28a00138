//! puper CLI
//!
//! Reads an HTML document from stdin, a file, or a URL, selects nodes with
//! CSS selector tokens, and prints them as indented, cleaned-up markup.

mod cli;
mod config;
mod report;

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use puper_browser::{Source, load};
use puper_display::Serializer;
use puper_display::markdown::to_markdown;
use puper_html::parse_document;
use puper_select::MatchProgram;

use crate::cli::Cli;
use crate::config::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.verbose) {
        eprint!("{}", report::render(&err));
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if report::is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", report::render(&err));
            report::exit_code(&err)
        }
    }
}

/// Load, parse, select, print markup or Markdown.
///
/// Selectors are compiled before anything is fetched, so a bad selector
/// fails fast and prints nothing.
fn run(cli: &Cli) -> Result<()> {
    let settings = cli.apply(Settings::load(cli.config.as_deref())?);

    let tokens = cli.tokens();
    let program = MatchProgram::compile(&tokens)?;

    let source = Source::from_arg(cli.input.as_deref());
    let options = settings.load_options(cli.wait_selector());
    let bytes = load(&source, &options).with_context(|| format!("failed to load {source}"))?;

    let tree = parse_document(&bytes, settings.charset.as_deref())
        .context("failed to parse the document")?;
    let nodes = program.execute(&tree, tree.root());
    tracing::debug!(selected = nodes.len(), "selection done");

    let serializer = Serializer::new(&tree, settings.policy());
    let mut out = BufWriter::new(io::stdout().lock());
    if settings.markdown {
        let markup = serializer.render(&nodes).context("failed to render the selection")?;
        let markdown = to_markdown(&markup, &settings.remove)
            .context("failed to convert the selection to Markdown")?;
        writeln!(out, "{markdown}")
            .and_then(|()| out.flush())
            .context("failed to write output")
    } else {
        serializer
            .write_nodes(&mut out, &nodes)
            .and_then(|()| out.flush())
            .context("failed to write output")
    }
}

/// Logs go to stderr; stdout carries only the selection.
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("PUPER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
