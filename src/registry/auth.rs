//! Authentication module for Docker Hub login

use crate::config::{CatalogConfig, Credentials};
use crate::error::{Result, TagsError};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    client: Client,
    auth_url: String,
}

impl Authenticator {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| TagsError::Configuration(format!("Failed to create auth client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    /// Share an HTTP client with the catalog client.
    pub fn with_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            auth_url: config.auth_url.clone(),
        }
    }

    /// Exchange credentials for a token with a single POST.
    ///
    /// Any status outside `[200, 400)` is a rejection and carries the
    /// response body as diagnostic text.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String> {
        let body = serde_json::to_vec(credentials)?;
        tracing::debug!(username = %credentials.username, url = %self.auth_url, "logging in");

        let response = self
            .client
            .post(&self.auth_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !(200..400).contains(&status) {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(TagsError::Auth(format!("login error: {}", error_text)));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| TagsError::Decode(format!("Failed to parse login response: {}", e)))?;
        Ok(login.token)
    }
}
