//! Tag model
//!
//! A [`Tag`] is one tag of one repository as reported by the catalog. The
//! owning repository is stamped on by the crawler; upstream payloads only
//! carry the name and the last-updated timestamp ([`TagRecord`]).

pub mod aggregate;

pub use aggregate::{Aggregate, RepositoryTags};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Tag entry as it appears in a catalog page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRecord {
    pub name: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl TagRecord {
    pub fn into_tag(self, repository: &str) -> Tag {
        Tag {
            name: self.name,
            last_updated: self.last_updated,
            repository: repository.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    name: String,
    last_updated: Option<DateTime<Utc>>,
    repository: String,
}

impl Tag {
    pub fn new(
        repository: impl Into<String>,
        name: impl Into<String>,
        last_updated: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            last_updated,
            repository: repository.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// `repository:name`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.repository, self.name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Orderings offered to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Repository, then tag name
    #[default]
    Name,
    /// Oldest first; tags without a timestamp sort first
    LastUpdated,
}

impl SortOrder {
    pub fn compare(self, a: &Tag, b: &Tag) -> Ordering {
        match self {
            SortOrder::Name => a
                .repository
                .cmp(&b.repository)
                .then_with(|| a.name.cmp(&b.name)),
            SortOrder::LastUpdated => a
                .last_updated
                .cmp(&b.last_updated)
                .then_with(|| SortOrder::Name.compare(a, b)),
        }
    }

    pub fn sort(self, tags: &mut [Tag]) {
        tags.sort_by(|a, b| self.compare(a, b));
    }
}
