//! Kudu-style HTTP deploy client
//!
//! Implements [`DeployTarget`] against the SCM sidecar endpoints exposed by
//! Azure-style app hosting platforms: `POST /api/zipdeploy` for the bundle
//! and `POST /api/wardeploy` for standalone war artifacts, both HTTP basic
//! auth. Large bundles upload slowly, hence the generous default timeout.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::DeployTarget;
use crate::config::Credentials;
use crate::error::DeployError;

/// Default request timeout for deploy uploads
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client for a Kudu-style deploy endpoint
pub struct KuduClient {
    base_url: String,
    credentials: Credentials,
    client: Client,
}

impl KuduClient {
    /// Create a client for `base_url` with the default upload timeout
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, DeployError> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, DeployError> {
        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    /// The configured endpoint base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn post_archive(
        &self,
        url: String,
        query: &[(&str, &str)],
        archive: &Path,
    ) -> Result<(), DeployError> {
        let file = File::open(archive)?;
        let response = self
            .client
            .post(&url)
            .query(query)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, "application/zip")
            .body(file)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl DeployTarget for KuduClient {
    fn zip_deploy(&self, archive: &Path) -> Result<(), DeployError> {
        debug!(
            "zip deploy of {} to {}",
            archive.display(),
            self.base_url
        );
        self.post_archive(self.endpoint("api/zipdeploy"), &[], archive)
    }

    fn war_deploy(&self, war: &Path, context_path: Option<&str>) -> Result<(), DeployError> {
        debug!("war deploy of {} to {}", war.display(), self.base_url);
        let mut query = Vec::new();
        if let Some(context) = context_path {
            query.push(("name", context));
        }
        self.post_archive(self.endpoint("api/wardeploy"), &query, war)
    }
}

/// User-Agent sent with deploy requests, `stevedore/{version}`
pub fn user_agent() -> String {
    format!("stevedore/{}", env!("CARGO_PKG_VERSION"))
}
