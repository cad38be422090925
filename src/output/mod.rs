//! Rendering of the crawled tags for the terminal

use crate::error::Result;
use crate::tags::{SortOrder, Tag};
use clap::ValueEnum;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct TagPrinter {
    pub sort: SortOrder,
    /// Print `repository:name` instead of the bare name
    pub prefix: bool,
    pub show_last_updated: bool,
    pub format: OutputFormat,
}

impl TagPrinter {
    pub fn new(sort: SortOrder) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_last_updated(mut self, show: bool) -> Self {
        self.show_last_updated = show;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    fn display_name(&self, tag: &Tag) -> String {
        if self.prefix {
            tag.qualified_name()
        } else {
            tag.name().to_string()
        }
    }

    /// Sorted text lines, one per tag.
    pub fn lines(&self, tags: &mut [Tag]) -> Vec<String> {
        self.sort.sort(tags);

        let names: Vec<String> = tags.iter().map(|tag| self.display_name(tag)).collect();
        if !self.show_last_updated {
            return names;
        }

        let width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);
        names
            .iter()
            .zip(tags.iter())
            .map(|(name, tag)| {
                let updated = tag
                    .last_updated()
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                format!("{:>width$} {}", name, updated, width = width)
            })
            .collect()
    }

    pub fn write<W: Write>(&self, out: &mut W, mut tags: Vec<Tag>) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                for line in self.lines(&mut tags) {
                    writeln!(out, "{}", line)?;
                }
            }
            OutputFormat::Json => {
                self.sort.sort(&mut tags);
                serde_json::to_writer_pretty(&mut *out, &tags)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
