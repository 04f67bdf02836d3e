//! Pull request representation and ordering

use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// An open pull request as fetched for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Link to the PR
    pub url: String,
    /// Author login (empty for deleted accounts)
    pub author: String,
    /// When the PR was created
    pub created_at: DateTime<Utc>,
}

impl PullRequest {
    /// Build a pull request from raw API fields, parsing `created_at`
    pub fn from_raw(
        number: u64,
        title: impl Into<String>,
        url: impl Into<String>,
        author: impl Into<String>,
        created_at: &str,
    ) -> Result<Self> {
        Ok(Self {
            number,
            title: title.into(),
            url: url.into(),
            author: author.into(),
            created_at: parse_timestamp(created_at)?,
        })
    }
}

/// Parse a GitHub date-time (RFC 3339) into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Timestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Direction in which the report lists pull requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

/// Sort by creation time. Stable, so equal timestamps keep fetch order.
pub fn sort_pull_requests(prs: &mut [PullRequest], order: SortOrder) {
    match order {
        SortOrder::Asc => prs.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Desc => prs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}
