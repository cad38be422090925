//! Repository crawler
//!
//! Follows continuation cursors for one repository until the catalog stops
//! handing them out. Pages are fetched one after another; parallelism lives
//! one level up, across repositories.

use crate::concurrency::JobResult;
use crate::error::Result;
use crate::registry::transport::{PageCursor, PageSource};
use crate::tags::Tag;
use std::sync::Arc;

/// Upper bound on the capacity reserved from a page's reported count
const MAX_PRESIZE: u64 = 10_000;

#[derive(Clone)]
pub struct RepositoryCrawler {
    source: Arc<dyn PageSource>,
}

impl RepositoryCrawler {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Crawl every page of `repository`. The result is all-or-nothing: the
    /// first failing page discards whatever was already collected.
    pub async fn crawl(&self, repository: &str, token: Option<&str>) -> JobResult {
        let outcome = self
            .collect(repository, token)
            .await
            .map_err(|e| e.for_repository(repository));

        JobResult {
            repository: repository.to_string(),
            outcome,
        }
    }

    async fn collect(&self, repository: &str, token: Option<&str>) -> Result<Vec<Tag>> {
        let mut cursor = PageCursor::First;
        let mut tags = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self.source.fetch_page(repository, &cursor, token).await?;
            pages += 1;

            if pages == 1 {
                tags.reserve(page.count.min(MAX_PRESIZE) as usize);
            }
            tags.extend(page.tags.into_iter().map(|record| record.into_tag(repository)));

            match page.next {
                Some(next) => cursor = PageCursor::Next(next),
                None => break,
            }
        }

        tracing::debug!(repository, pages, tags = tags.len(), "repository crawl complete");
        Ok(tags)
    }
}
