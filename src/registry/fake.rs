//! In-memory page source for unit tests

use crate::error::{Result, TagsError};
use crate::registry::transport::{Page, PageCursor, PageSource};
use crate::tags::TagRecord;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeCatalog {
    pages: HashMap<String, Vec<Vec<String>>>,
    failing: HashSet<(String, usize)>,
    requests: Mutex<HashMap<String, usize>>,
    tokens: Mutex<Vec<Option<String>>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `total` generated tag names into pages of `page_size`.
    pub fn with_repository(mut self, repository: &str, total: usize, page_size: usize) -> Self {
        let names: Vec<String> = (1..=total).map(|i| format!("tag-{}", i)).collect();
        let mut pages: Vec<Vec<String>> = names.chunks(page_size).map(|c| c.to_vec()).collect();
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        self.pages.insert(repository.to_string(), pages);
        self
    }

    pub fn with_pages(mut self, repository: &str, pages: &[&[&str]]) -> Self {
        let pages = pages
            .iter()
            .map(|page| page.iter().map(|name| name.to_string()).collect())
            .collect();
        self.pages.insert(repository.to_string(), pages);
        self
    }

    /// Make the request for page `index` (0-based) of `repository` fail.
    pub fn failing_at(mut self, repository: &str, index: usize) -> Self {
        self.failing.insert((repository.to_string(), index));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self, repository: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .get(repository)
            .copied()
            .unwrap_or(0)
    }

    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn cursor_index(repository: &str, cursor: &PageCursor) -> Result<usize> {
        match cursor {
            PageCursor::First => Ok(0),
            PageCursor::Next(url) => url
                .strip_prefix(&format!("fake://{}/", repository))
                .and_then(|index| index.parse().ok())
                .ok_or_else(|| TagsError::Request(format!("unexpected cursor {}", url))),
        }
    }
}

#[async_trait]
impl PageSource for FakeCatalog {
    async fn fetch_page(
        &self,
        repository: &str,
        cursor: &PageCursor,
        token: Option<&str>,
    ) -> Result<Page> {
        *self
            .requests
            .lock()
            .unwrap()
            .entry(repository.to_string())
            .or_insert(0) += 1;
        self.tokens.lock().unwrap().push(token.map(str::to_string));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let index = Self::cursor_index(repository, cursor)?;
        if self.failing.contains(&(repository.to_string(), index)) {
            return Err(TagsError::Decode(format!(
                "page {} of {} is not valid JSON",
                index + 1,
                repository
            )));
        }

        let pages = self.pages.get(repository).ok_or_else(|| TagsError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: r#"{"detail": "Object not found"}"#.to_string(),
        })?;
        let names = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len()).then(|| format!("fake://{}/{}", repository, index + 1));

        Ok(Page {
            count: pages.iter().map(Vec::len).sum::<usize>() as u64,
            next,
            tags: names
                .into_iter()
                .map(|name| TagRecord {
                    name,
                    last_updated: None,
                })
                .collect(),
        })
    }
}
