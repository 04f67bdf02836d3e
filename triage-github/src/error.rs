//! Error types for GitHub operations

use std::time::Duration;

use thiserror::Error;

use crate::SyncStage;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub REST API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Transport error on a GraphQL request
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// REST request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// GraphQL request rejected or answered with errors
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Repository not found
    #[error("Repository {0} not found or not accessible")]
    RepoNotFound(String),

    /// Project board not found
    #[error("Project {0} not found or not accessible")]
    ProjectNotFound(String),

    /// Pull request not found
    #[error("Pull request #{0} not found")]
    PrNotFound(u64),

    /// Member listing for an organization failed
    #[error("Failed to fetch members of organization {org}: {source}")]
    Members {
        org: String,
        #[source]
        source: Box<Error>,
    },

    /// One step of a project sync failed
    #[error("Failed to sync PR #{number} to project ({stage}): {source}")]
    Sync {
        number: u64,
        stage: SyncStage,
        #[source]
        source: Box<Error>,
    },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error (timestamps, configuration)
    #[error(transparent)]
    Core(#[from] triage_core::Error),

}
