//! itags library
//!
//! Lists every tag of one or more Docker Hub repositories. The catalog is
//! crawled page by page per repository, with repositories spread over a
//! bounded pool of workers; failures stay confined to the repository that
//! produced them.

pub mod cli;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod registry;
pub mod tags;

pub use concurrency::Dispatcher;
pub use config::{CatalogConfig, Credentials};
pub use error::{Result, TagsError};
pub use registry::{Authenticator, CatalogClient};
pub use tags::{Aggregate, Tag};
