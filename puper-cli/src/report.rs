//! Error reporting and exit codes.

use std::fmt::Write;
use std::io;
use std::process::ExitCode;

use owo_colors::OwoColorize;
use puper_select::SelectorSyntaxError;

/// Exit status for a malformed selector.
pub const EXIT_SELECTOR: u8 = 2;

/// Exit status for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Map an error to the process exit status.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<SelectorSyntaxError>().is_some() {
        EXIT_SELECTOR
    } else {
        EXIT_FAILURE
    }
}

/// True when the reader of stdout went away, as in `puper ... | head`.
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
    })
}

/// A red header with the outermost message, then one line per cause.
pub fn render(err: &anyhow::Error) -> String {
    let mut out = format!("{} {err}\n", "error:".red().bold());
    for cause in err.chain().skip(1) {
        let _ = writeln!(out, "  {} {cause}", "caused by:".dimmed());
    }
    out
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, anyhow};

    use super::*;

    #[test]
    fn test_selector_errors_exit_with_two() {
        let err = anyhow::Error::from(SelectorSyntaxError::new("[bad", "unterminated attribute selector"));
        assert_eq!(exit_status(&err), EXIT_SELECTOR);
        assert_eq!(exit_status(&err.context("while compiling")), EXIT_SELECTOR);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        let err = anyhow!("no such file");
        assert_eq!(exit_status(&err), EXIT_FAILURE);
    }

    #[test]
    fn test_render_lists_causes() {
        let err = Err::<(), _>(io::Error::new(io::ErrorKind::NotFound, "missing.html"))
            .context("failed to load missing.html")
            .unwrap_err();
        let text = render(&err);
        assert!(text.contains("error:"));
        assert!(text.contains("failed to load missing.html"));
        assert!(text.contains("caused by:"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_broken_pipe_detected_through_context() {
        let err = Err::<(), _>(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            .context("failed to write output")
            .unwrap_err();
        assert!(is_broken_pipe(&err));
        assert!(!is_broken_pipe(&anyhow!("other")));
    }
}
