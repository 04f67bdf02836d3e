//! Project board references and sync outcomes

/// A project board resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    /// Board number as shown in the project URL
    pub number: u64,
    /// Opaque node ID used by the GraphQL API
    pub id: String,
}

/// Result of syncing one pull request to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The PR was linked to the board by this run
    Added,
    /// The board already had an item for the PR
    AlreadyPresent,
}

impl SyncOutcome {
    /// Human-readable report line for a PR
    pub fn describe(&self, pr_number: u64, project_number: u64) -> String {
        match self {
            SyncOutcome::Added => format!("PR #{} added to project {}", pr_number, project_number),
            SyncOutcome::AlreadyPresent => {
                format!("PR #{} already in project {}", pr_number, project_number)
            }
        }
    }
}
