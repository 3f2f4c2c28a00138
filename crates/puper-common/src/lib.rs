//! Common utilities for puper.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - colored terminal output for recoverable oddities
//! - **Networking** - blocking HTTP GET with a browser-like User-Agent

pub mod net;
pub mod warning;

pub use net::{FetchError, fetch_bytes};
pub use warning::{clear_warnings, warn_once};
