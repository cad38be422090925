//! Page transport abstraction for the tag catalog
//!
//! The crawler only needs "give me this page of this repository". Keeping
//! that behind [`PageSource`] lets the worker pool run against the real
//! HTTP catalog ([`crate::registry::CatalogClient`]) or any other source.

use crate::error::Result;
use crate::tags::TagRecord;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

/// Where to read the next page from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// First page, URL derived from the repository name
    First,
    /// Absolute continuation URL returned by the previous page
    Next(String),
}

/// One decoded catalog page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Total number of tags in the repository
    pub count: u64,
    #[serde(default, deserialize_with = "non_empty_url")]
    pub next: Option<String>,
    #[serde(default, rename = "results")]
    pub tags: Vec<TagRecord>,
}

fn non_empty_url<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let next: Option<String> = Option::deserialize(deserializer)?;
    Ok(next.filter(|url| !url.is_empty()))
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch exactly one page. Errors are returned, never retried.
    async fn fetch_page(
        &self,
        repository: &str,
        cursor: &PageCursor,
        token: Option<&str>,
    ) -> Result<Page>;
}
