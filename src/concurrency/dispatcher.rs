//! Worker pool dispatching one crawl job per repository

use crate::concurrency::{Job, JobResult};
use crate::error::TagsError;
use crate::registry::{PageSource, RepositoryCrawler};
use crate::tags::Aggregate;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedSender};

type JobQueue = Arc<Mutex<VecDeque<Job>>>;

/// Number of workers started for a requested concurrency; never zero.
pub fn worker_count(requested: usize) -> usize {
    requested.max(1)
}

#[derive(Clone)]
pub struct Dispatcher {
    crawler: RepositoryCrawler,
}

impl Dispatcher {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            crawler: RepositoryCrawler::new(source),
        }
    }

    /// Crawl every repository with at most `concurrency` crawls in flight.
    ///
    /// Always completes: each distinct repository gets a key in the returned
    /// [`Aggregate`], failed ones with no tags and their error. Duplicate
    /// names are crawled once.
    pub async fn fetch_all<S: AsRef<str>>(
        &self,
        repositories: &[S],
        token: Option<&str>,
        concurrency: usize,
    ) -> Aggregate {
        let jobs = unique_jobs(repositories);
        let mut aggregate = Aggregate::new();
        if jobs.is_empty() {
            return aggregate;
        }

        let mut pending: HashSet<String> = jobs.iter().map(|job| job.repository.clone()).collect();
        let total = jobs.len();
        let workers = worker_count(concurrency);
        tracing::debug!(repositories = total, workers, "starting tag crawl");

        let queue: JobQueue = Arc::new(Mutex::new(jobs.into()));
        let token: Option<Arc<str>> = token.filter(|t| !t.is_empty()).map(Arc::from);
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();

        for worker_id in 0..workers {
            tokio::spawn(run_worker(
                worker_id,
                Arc::clone(&queue),
                self.crawler.clone(),
                token.clone(),
                result_tx.clone(),
            ));
        }
        // Only workers hold senders now, so the channel closes when the last exits.
        drop(result_tx);

        while aggregate.len() < total {
            let Some(result) = result_rx.recv().await else {
                break;
            };
            pending.remove(&result.repository);
            if let Err(err) = &result.outcome {
                tracing::warn!(repository = %result.repository, error = %err, "repository crawl failed");
            }
            aggregate.record(result.repository, result.outcome);
        }

        for repository in pending {
            tracing::warn!(repository = %repository, "no result reported for repository");
            let err = TagsError::Worker("worker exited before reporting a result".to_string())
                .for_repository(&repository);
            aggregate.record(repository, Err(err));
        }

        tracing::debug!(
            tags = aggregate.tag_count(),
            failures = aggregate.failure_count(),
            "tag crawl finished"
        );
        aggregate
    }

    /// Tag names of a single repository, empty if the crawl failed.
    pub async fn tags_for_repository(
        &self,
        repository: &str,
        token: Option<&str>,
        concurrency: usize,
    ) -> Vec<String> {
        self.fetch_all(&[repository], token, concurrency)
            .await
            .into_tags()
            .into_iter()
            .map(|tag| tag.name().to_string())
            .collect()
    }

    /// `repository:name` for every tag of every repository.
    pub async fn tags_for_repositories<S: AsRef<str>>(
        &self,
        repositories: &[S],
        token: Option<&str>,
        concurrency: usize,
    ) -> Vec<String> {
        self.fetch_all(repositories, token, concurrency)
            .await
            .into_tags()
            .iter()
            .map(|tag| tag.qualified_name())
            .collect()
    }
}

fn unique_jobs<S: AsRef<str>>(repositories: &[S]) -> Vec<Job> {
    let mut seen = HashSet::new();
    repositories
        .iter()
        .map(AsRef::as_ref)
        .filter(|repository| seen.insert(*repository))
        .map(|repository| Job {
            repository: repository.to_string(),
        })
        .collect()
}

async fn run_worker(
    worker_id: usize,
    queue: JobQueue,
    crawler: RepositoryCrawler,
    token: Option<Arc<str>>,
    results: UnboundedSender<JobResult>,
) {
    let mut completed = 0usize;
    loop {
        let job = queue.lock().await.pop_front();
        let Some(job) = job else {
            break;
        };

        let result = crawler.crawl(&job.repository, token.as_deref()).await;
        completed += 1;
        if results.send(result).is_err() {
            // dispatcher stopped listening
            break;
        }
    }
    tracing::trace!(worker = worker_id, completed, "worker exiting");
}
