//! Command line interface module
//!
//! Argument parsing, environment fallbacks and the runner that wires the
//! login, the crawl and the printer together.

pub mod args;
pub mod runner;

pub use args::{Args, SortBy};
pub use runner::{RunSummary, Runner};
