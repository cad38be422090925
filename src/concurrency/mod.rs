//! Concurrency module: the bounded worker pool that crawls repositories
//!
//! The [`Dispatcher`] owns a fixed number of workers. Each worker claims the
//! next [`Job`] from a shared queue, runs the repository crawler on it and
//! publishes exactly one [`JobResult`] on the result channel. The dispatcher
//! is the only place the [`crate::tags::Aggregate`] is mutated.
//!
//! ```no_run
//! use itags::concurrency::Dispatcher;
//! use itags::config::CatalogConfig;
//! use itags::registry::CatalogClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> itags::Result<()> {
//! let client = CatalogClient::new(CatalogConfig::default())?;
//! let dispatcher = Dispatcher::new(Arc::new(client));
//!
//! let aggregate = dispatcher.fetch_all(&["redis", "mgkio/figlet"], None, 20).await;
//! for (repository, failure) in aggregate.failures() {
//!     eprintln!("{}: {}", repository, failure);
//! }
//! println!("{} tags", aggregate.tag_count());
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;

pub use dispatcher::{Dispatcher, worker_count};

use crate::error::TagsError;
use crate::tags::Tag;

/// Crawl every tag of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub repository: String,
}

/// Outcome of one [`Job`]; a failed crawl carries no tags
#[derive(Debug)]
pub struct JobResult {
    pub repository: String,
    pub outcome: Result<Vec<Tag>, TagsError>,
}
