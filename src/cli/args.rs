//! Command-line argument parsing

use crate::config::{
    CatalogConfig, Credentials, DEFAULT_AUTH_URL, DEFAULT_REPOSITORY_BASE_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WORKERS,
};
use crate::output::OutputFormat;
use crate::tags::SortOrder;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    Name,
    #[value(name = "lastUpdated", alias = "last-updated")]
    LastUpdated,
}

impl From<SortBy> for SortOrder {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Name => SortOrder::Name,
            SortBy::LastUpdated => SortOrder::LastUpdated,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "itags")]
#[command(about = "List the image tags of one or more Docker Hub repositories")]
#[command(
    long_about = "List the image tags of one or more Docker Hub repositories.\n\n\
    To list tags of private repositories either give a username and password \
    or a Docker Hub JWT."
)]
#[command(version)]
pub struct Args {
    /// Repositories to list, e.g. `redis` or `mgkio/figlet`
    #[arg(value_name = "REPOSITORY", required = true)]
    pub repositories: Vec<String>,

    #[arg(long, short = 'u', help = "Username for Docker Hub login")]
    pub username: Option<String>,

    #[arg(long, short = 'p', help = "Password for Docker Hub login")]
    pub password: Option<String>,

    #[arg(long, help = "JWT to use, ignored if username and password are given")]
    pub jwt: Option<String>,

    #[arg(long = "sort-by", value_enum, default_value = "name", help = "Sort by repository and name, or by last update")]
    pub sort_by: SortBy,

    #[arg(long = "show-last-updated", help = "Include the last-updated time in the output")]
    pub show_last_updated: bool,

    /// Always on when more than one repository is given
    #[arg(long, help = "Prefix each tag with its repository name")]
    pub prefix: bool,

    /// Unset means `ITAGS_WORKERS`, then 20
    #[arg(
        long,
        short = 'w',
        allow_negative_numbers = true,
        help = "Maximum number of repositories crawled in parallel [default: 20]"
    )]
    pub workers: Option<i64>,

    /// Unset means `ITAGS_TIMEOUT`, then 15
    #[arg(long, short = 't', help = "Timeout for each HTTP request in seconds [default: 15]")]
    pub timeout: Option<u64>,

    #[arg(long = "page-size", default_value_t = 100, help = "Tags requested per catalog page")]
    pub page_size: u32,

    #[arg(long = "catalog-url", default_value = DEFAULT_REPOSITORY_BASE_URL, help = "Base URL of the repositories API")]
    pub catalog_url: String,

    #[arg(long = "auth-url", default_value = DEFAULT_AUTH_URL, help = "Login endpoint")]
    pub auth_url: String,

    #[arg(long, short = 'o', value_enum, default_value = "text", help = "Output format")]
    pub output: OutputFormat,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, short = 'q', conflicts_with = "verbose", help = "Only print tags and errors")]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse().from_env()
    }

    /// Fill unset options from `ITAGS_*` environment variables.
    pub fn from_env(self) -> Self {
        self.from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.username.is_none() {
            self.username = lookup("ITAGS_USERNAME");
        }

        if self.password.is_none() {
            self.password = lookup("ITAGS_PASSWORD");
        }

        if self.jwt.is_none() {
            self.jwt = lookup("ITAGS_JWT");
        }

        if self.workers.is_none() {
            self.workers = lookup("ITAGS_WORKERS").and_then(|w| w.parse().ok());
        }

        if self.timeout.is_none() {
            self.timeout = lookup("ITAGS_TIMEOUT").and_then(|t| t.parse().ok());
        }

        self
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.repositories.iter().any(|r| r.trim().is_empty()) {
            return Err("Repository names cannot be empty".to_string());
        }

        if self.password.is_some() && self.username.is_none() {
            return Err("--password requires --username".to_string());
        }

        if self.timeout_secs() == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.page_size == 0 {
            return Err("Page size must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Worker count; zero and negative values run a single worker.
    pub fn concurrency(&self) -> usize {
        let workers = self.workers.unwrap_or(DEFAULT_WORKERS as i64);
        usize::try_from(workers.max(1)).unwrap_or(usize::MAX)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.username.as_ref().filter(|u| !u.is_empty()).map(|username| {
            Credentials::new(username.clone(), self.password.clone().unwrap_or_default())
        })
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new()
            .with_repository_base_url(self.catalog_url.clone())
            .with_auth_url(self.auth_url.clone())
            .with_page_size(self.page_size)
            .with_timeout(self.timeout_secs())
    }
}
