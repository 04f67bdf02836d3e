//! The GitHub operations a run depends on

use async_trait::async_trait;

use crate::Result;

/// A pull request as returned by the listing, before timestamp parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    /// Author login, with the `[bot]` marker for App accounts; empty if deleted
    pub author: String,
    /// Creation time exactly as sent by the API
    pub created_at: String,
}

/// One page of the open pull request listing
#[derive(Debug, Clone, Default)]
pub struct PullRequestPage {
    pub nodes: Vec<RawPullRequest>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// Single-request GitHub operations. Pagination and error policy live in
/// the stages built on top of this trait.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// List one page of an organization's member logins
    async fn org_members_page(&self, org: &str, page: u32, per_page: u8) -> Result<Vec<String>>;

    /// List one page of a repository's open pull requests
    async fn open_pull_requests_page(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage>;

    /// Resolve an organization project board's node ID from its number
    async fn project_id(&self, owner: &str, number: u64) -> Result<String>;

    /// Resolve a pull request's node ID from its number
    async fn pull_request_id(&self, owner: &str, repo: &str, number: u64) -> Result<String>;

    /// Content node IDs of the items on a project board (first page only)
    async fn project_item_content_ids(&self, project_id: &str) -> Result<Vec<String>>;

    /// Link a content node to a project board, returning the new item ID
    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<String>;
}
