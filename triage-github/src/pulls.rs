//! Open pull request fetching

use tracing::{debug, info};
use triage_core::PullRequest;

use crate::{Error, GitHubApi, Result};

/// Fetch every open pull request of a repository
///
/// All pages are collected before returning since the report is sorted as a
/// whole. A failed page or a malformed timestamp fails the fetch.
pub async fn fetch_open_pull_requests<A: GitHubApi + ?Sized>(
    api: &A,
    owner: &str,
    repo: &str,
) -> Result<Vec<PullRequest>> {
    let mut pull_requests = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api
            .open_pull_requests_page(owner, repo, cursor.as_deref())
            .await?;
        debug!(count = page.nodes.len(), has_next = page.has_next_page, "Received pull requests page");

        for raw in page.nodes {
            pull_requests.push(PullRequest::from_raw(
                raw.number,
                raw.title,
                raw.url,
                raw.author,
                &raw.created_at,
            )?);
        }

        if !page.has_next_page {
            break;
        }

        match page.end_cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(Error::Parse(
                    "Pull request page reported more results without a cursor".to_string(),
                ))
            }
        }
    }

    info!(owner, repo, count = pull_requests.len(), "Fetched open pull requests");

    Ok(pull_requests)
}
