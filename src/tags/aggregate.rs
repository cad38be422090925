//! Per-repository results of a crawl

use crate::error::TagsError;
use crate::tags::Tag;
use std::collections::HashMap;

/// Everything known about one repository after a crawl
#[derive(Debug, Default)]
pub struct RepositoryTags {
    pub tags: Vec<Tag>,
    /// Set when the crawl failed; `tags` is then empty
    pub error: Option<TagsError>,
}

/// Repository name to tags, keyed in the order results arrived
#[derive(Debug, Default)]
pub struct Aggregate {
    entries: Vec<(String, RepositoryTags)>,
    index: HashMap<String, usize>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_mut(&mut self, repository: String) -> &mut RepositoryTags {
        let position = match self.index.get(&repository) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(repository.clone(), position);
                self.entries.push((repository, RepositoryTags::default()));
                position
            }
        };
        &mut self.entries[position].1
    }

    /// Fold one crawl outcome in. A failure initializes the key without
    /// contributing tags; the first failure recorded for a key is kept.
    pub fn record(&mut self, repository: String, outcome: Result<Vec<Tag>, TagsError>) {
        let entry = self.entry_mut(repository);
        match outcome {
            Ok(mut tags) => entry.tags.append(&mut tags),
            Err(err) => {
                if entry.error.is_none() {
                    entry.error = Some(err);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, repository: &str) -> Option<&RepositoryTags> {
        self.index
            .get(repository)
            .map(|&position| &self.entries[position].1)
    }

    /// Tags for `repository`; empty for unknown or failed repositories.
    pub fn tags(&self, repository: &str) -> &[Tag] {
        self.get(repository)
            .map(|entry| entry.tags.as_slice())
            .unwrap_or(&[])
    }

    pub fn error(&self, repository: &str) -> Option<&TagsError> {
        self.get(repository).and_then(|entry| entry.error.as_ref())
    }

    pub fn repositories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RepositoryTags)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &TagsError)> {
        self.iter()
            .filter_map(|(name, entry)| entry.error.as_ref().map(|err| (name, err)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn tag_count(&self) -> usize {
        self.entries.iter().map(|(_, entry)| entry.tags.len()).sum()
    }

    /// The bare mapping, dropping failure details.
    pub fn into_tag_map(self) -> HashMap<String, Vec<Tag>> {
        self.entries
            .into_iter()
            .map(|(name, entry)| (name, entry.tags))
            .collect()
    }

    /// Every tag of every repository, in key order then page order.
    pub fn into_tags(self) -> Vec<Tag> {
        self.entries
            .into_iter()
            .flat_map(|(_, entry)| entry.tags)
            .collect()
    }
}
