//! Selection of pull requests from outside contributors

use crate::{BotPolicy, MemberSet, PullRequest};

/// Decides which pull requests make it into the report
#[derive(Debug, Clone)]
pub struct ContributionFilter {
    members: MemberSet,
    bots: BotPolicy,
}

impl ContributionFilter {
    pub fn new(members: MemberSet, bots: BotPolicy) -> Self {
        Self { members, bots }
    }

    /// A PR survives iff its author is not a member and is not an excluded bot
    pub fn survives(&self, pr: &PullRequest) -> bool {
        !self.members.contains(&pr.author) && !self.bots.excludes(&pr.author)
    }

    /// Surviving PRs, in input order
    pub fn apply<'a>(&'a self, prs: &'a [PullRequest]) -> impl Iterator<Item = &'a PullRequest> {
        prs.iter().filter(move |pr| self.survives(pr))
    }
}
