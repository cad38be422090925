//! Runner tying login, crawl and printing together

use crate::cli::args::Args;
use crate::concurrency::Dispatcher;
use crate::error::{Result, TagsError};
use crate::logging::Logger;
use crate::output::TagPrinter;
use crate::registry::{Authenticator, CatalogClient};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

/// What a run did, used to pick the exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub repositories: usize,
    pub failed: usize,
    pub tags: usize,
}

impl RunSummary {
    pub fn all_failed(&self) -> bool {
        self.repositories > 0 && self.failed == self.repositories
    }
}

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self { args, output }
    }

    pub fn logger(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out).await
    }

    pub async fn run_with_output<W: Write>(&self, out: &mut W) -> Result<RunSummary> {
        self.output.section("itags");
        self.args.validate().map_err(TagsError::Configuration)?;

        let config = self.args.catalog_config();
        let client = CatalogClient::new(config.clone())?;
        self.output.detail(&format!("Catalog: {}", config.repository_base_url));

        let token = self.resolve_token(&client).await?;

        let concurrency = self.args.concurrency();
        self.output.verbose(&format!(
            "Crawling {} repositories with {} workers",
            self.args.repositories.len(),
            concurrency
        ));

        let dispatcher = Dispatcher::new(Arc::new(client));
        let aggregate = dispatcher
            .fetch_all(&self.args.repositories, token.as_deref(), concurrency)
            .await;

        for (_, failure) in aggregate.failures() {
            if failure.is_timeout() {
                self.output.error(&format!("{} (request timed out after {}s)", failure, self.args.timeout_secs()));
            } else {
                self.output.error(&failure.to_string());
            }
        }

        let summary = RunSummary {
            repositories: aggregate.len(),
            failed: aggregate.failure_count(),
            tags: aggregate.tag_count(),
        };

        let distinct: HashSet<&str> = self.args.repositories.iter().map(String::as_str).collect();
        let printer = TagPrinter::new(self.args.sort_by.into())
            .with_prefix(self.args.prefix || distinct.len() > 1)
            .with_last_updated(self.args.show_last_updated)
            .with_format(self.args.output);
        printer.write(out, aggregate.into_tags())?;

        self.output.summary_kv(
            "Summary",
            &[
                ("Repositories", summary.repositories.to_string()),
                ("Failed", summary.failed.to_string()),
                ("Tags", summary.tags.to_string()),
                ("Elapsed", self.output.format_duration(self.output.elapsed())),
            ],
        );
        if summary.failed > 0 && !summary.all_failed() {
            self.output.warning(&format!(
                "{} of {} repositories could not be listed",
                summary.failed, summary.repositories
            ));
        }

        Ok(summary)
    }

    /// Username/password wins over a supplied JWT; a rejected login aborts.
    async fn resolve_token(&self, client: &CatalogClient) -> Result<Option<String>> {
        if let Some(credentials) = self.args.credentials() {
            self.output.verbose(&format!("Logging in as {}", credentials.username));
            let auth = Authenticator::with_client(client.http_client().clone(), client.config());
            let token = auth.authenticate(&credentials).await?;
            self.output.success("Login successful");
            return Ok(Some(token));
        }

        if self.args.jwt.is_some() {
            self.output.detail("Using supplied JWT");
        }
        Ok(self.args.jwt.clone().filter(|jwt| !jwt.is_empty()))
    }
}
