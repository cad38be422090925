//! Registry module for Docker Hub interactions
//!
//! This module provides the catalog page client, the login flow and the
//! per-repository crawler that walks a repository's tag pages.

pub mod auth;
pub mod client;
pub mod crawler;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use auth::Authenticator;
pub use client::{CatalogClient, CatalogClientBuilder};
pub use crawler::RepositoryCrawler;
pub use transport::{Page, PageCursor, PageSource};
