//! Project board sync for surviving pull requests
//!
//! Syncing one PR walks `Unchecked -> IdResolved -> Checked -> Linked`, one
//! request per step. A failed step stops the walk for that PR and is
//! reported as [`Error::Sync`] naming the step; the caller decides whether
//! to carry on with the next PR. Nothing is retried.

use std::fmt;

use tracing::{debug, info};
use triage_core::{ProjectRef, SyncOutcome};

use crate::{Error, GitHubApi, Result};

/// Step of a pull request sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Looking up the PR's node ID
    ResolvePullRequest,
    /// Listing the board's existing items
    ListItems,
    /// Linking the PR to the board
    AddItem,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::ResolvePullRequest => write!(f, "resolving pull request ID"),
            SyncStage::ListItems => write!(f, "listing project items"),
            SyncStage::AddItem => write!(f, "adding project item"),
        }
    }
}

/// Resolve an organization's project board once per run
pub async fn resolve_project<A: GitHubApi + ?Sized>(
    api: &A,
    owner: &str,
    number: u64,
) -> Result<ProjectRef> {
    let id = api.project_id(owner, number).await?;
    info!(owner, number, project_id = %id, "Resolved project board");
    Ok(ProjectRef { number, id })
}

/// Links pull requests of one repository to a project board
pub struct ProjectSyncer<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    project: ProjectRef,
    owner: String,
    repo: String,
}

impl<'a, A: GitHubApi + ?Sized> ProjectSyncer<'a, A> {
    pub fn new(
        api: &'a A,
        project: ProjectRef,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            api,
            project,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    /// Make sure the pull request is on the board
    pub async fn sync(&self, number: u64) -> Result<SyncOutcome> {
        let fail = move |stage: SyncStage| {
            move |source: Error| Error::Sync {
                number,
                stage,
                source: Box::new(source),
            }
        };

        let content_id = self
            .api
            .pull_request_id(&self.owner, &self.repo, number)
            .await
            .map_err(fail(SyncStage::ResolvePullRequest))?;
        debug!(number, content_id = %content_id, "Resolved pull request ID");

        // Single page of items; boards with more items than that are not scanned further
        let linked = self
            .api
            .project_item_content_ids(&self.project.id)
            .await
            .map_err(fail(SyncStage::ListItems))?;

        if linked.iter().any(|id| id == &content_id) {
            debug!(number, "Pull request already on project board");
            return Ok(SyncOutcome::AlreadyPresent);
        }

        let item_id = self
            .api
            .add_project_item(&self.project.id, &content_id)
            .await
            .map_err(fail(SyncStage::AddItem))?;
        info!(
            number,
            project = self.project.number,
            item_id = %item_id,
            "Added pull request to project board"
        );

        Ok(SyncOutcome::Added)
    }
}
