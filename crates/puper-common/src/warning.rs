//! User-facing warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the selector compiler, the charset sniffer, and the CLI to report
//! input that was accepted but probably not what the user meant.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (prints once per unique message).
///
/// Returns `true` if the message was printed, `false` if it had already been
/// reported.
///
/// # Example
/// ```
/// use puper_common::warn_once;
///
/// let _ = warn_once("selector", "trailing `>` has nothing to apply to");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        tracing::debug!(component = component, "warning: {message}");
        eprintln!("{}", format!("[puper {component}] ⚠ {message}").yellow());
    }
    should_print
}

/// Clear all recorded warnings.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
