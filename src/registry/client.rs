//! HTTP implementation of the catalog page source. One GET per page, the
//! body is read in full before decoding, nothing is retried.

use crate::config::CatalogConfig;
use crate::error::{Result, TagsError};
use crate::registry::transport::{Page, PageCursor, PageSource};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use url::Url;

pub struct CatalogClientBuilder {
    config: CatalogConfig,
}

impl CatalogClientBuilder {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<CatalogClient> {
        self.config.validate()?;

        let client = Client::builder()
            .timeout(self.config.timeout_duration())
            .build()?;

        Ok(CatalogClient {
            client,
            config: self.config,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: CatalogConfig) -> CatalogClientBuilder {
        CatalogClientBuilder::new(config)
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The underlying HTTP client, shared with the authenticator.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// `redis` becomes `library/redis`; `mgkio/figlet` is left alone.
    pub fn qualified_repository(&self, repository: &str) -> String {
        if repository.contains('/') {
            repository.to_string()
        } else {
            format!("{}/{}", self.config.default_namespace, repository)
        }
    }

    pub fn first_page_url(&self, repository: &str) -> Result<Url> {
        if repository.is_empty() {
            return Err(TagsError::Request("Repository name cannot be empty".to_string()));
        }

        let url = format!(
            "{}/{}/tags/?page_size={}",
            self.config.repository_base_url.trim_end_matches('/'),
            self.qualified_repository(repository),
            self.config.page_size
        );
        Ok(Url::parse(&url)?)
    }

    fn page_url(&self, repository: &str, cursor: &PageCursor) -> Result<Url> {
        match cursor {
            PageCursor::First => self.first_page_url(repository),
            PageCursor::Next(next) => Ok(Url::parse(next)?),
        }
    }
}

#[async_trait]
impl PageSource for CatalogClient {
    async fn fetch_page(
        &self,
        repository: &str,
        cursor: &PageCursor,
        token: Option<&str>,
    ) -> Result<Page> {
        let url = self.page_url(repository, cursor)?;
        tracing::debug!(repository, %url, "fetching tag page");

        let mut request = self.client.get(url);
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            request = request.header(AUTHORIZATION, format!("JWT {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(TagsError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice::<Page>(&body).map_err(|e| {
            TagsError::Decode(format!("Failed to parse tag page for {}: {}", repository, e))
        })
    }
}
