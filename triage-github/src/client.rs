//! GitHub API client using octocrab for REST and reqwest for GraphQL

use std::time::Duration;

use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use tracing::{debug, info};
use triage_core::{Config, Secrets};
use url::Url;

use crate::api::{GitHubApi, PullRequestPage};
use crate::{Error, Result};

const USER_AGENT_VALUE: &str = concat!("pr-triage/", env!("CARGO_PKG_VERSION"));

/// GitHub API client shared by every stage of a run
pub struct GitHubClient {
    rest: Octocrab,
    http: reqwest::Client,
    graphql_url: Url,
    timeout: Duration,
}

impl GitHubClient {
    /// Create a client for the configured API root
    ///
    /// Every request made through the client is bounded by
    /// `config.request_timeout` and sent exactly once.
    pub fn new(config: &Config, secrets: &Secrets) -> Result<Self> {
        let token = secrets.github_token();

        // Validated before octocrab sees the token
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Auth("GitHub token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let rest = Octocrab::builder()
            .add_retry_config(RetryConfig::None)
            .base_uri(config.api_url.as_str())
            .map_err(|e| Error::Auth(format!("Invalid API URL {}: {}", config.api_url, e)))?
            .personal_token(token.to_string())
            .set_connect_timeout(Some(config.request_timeout))
            .set_read_timeout(Some(config.request_timeout))
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let graphql_url = config.graphql_url()?;

        info!(api = %config.api_url, timeout = ?config.request_timeout, "Created GitHub client");

        Ok(Self {
            rest,
            http,
            graphql_url,
            timeout: config.request_timeout,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("graphql_url", &self.graphql_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    // GraphQL's membersWithRole does not return the full membership list, so
    // members come from the REST endpoint.
    async fn org_members_page(&self, org: &str, page: u32, per_page: u8) -> Result<Vec<String>> {
        debug!(org, page, per_page, "Fetching organization members page");

        // octocrab's read timeout only bounds the gap between reads
        let orgs = self.rest.orgs(org);
        let request = orgs
            .list_members()
            .per_page(per_page)
            .page(page)
            .send();
        let members = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        Ok(members.items.into_iter().map(|m| m.login).collect())
    }

    async fn open_pull_requests_page(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage> {
        self.query_open_pull_requests(owner, repo, cursor).await
    }

    async fn project_id(&self, owner: &str, number: u64) -> Result<String> {
        self.query_project_id(owner, number).await
    }

    async fn pull_request_id(&self, owner: &str, repo: &str, number: u64) -> Result<String> {
        self.query_pull_request_id(owner, repo, number).await
    }

    async fn project_item_content_ids(&self, project_id: &str) -> Result<Vec<String>> {
        self.query_project_item_content_ids(project_id).await
    }

    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<String> {
        self.mutate_add_project_item(project_id, content_id).await
    }
}
