//! Organization member resolution

use std::time::Duration;

use tracing::{debug, info};
use triage_core::config::MAX_PER_PAGE;
use triage_core::MemberSet;

use crate::{Error, GitHubApi, Result};

/// Collects the members of every configured organization into one set
pub struct MemberResolver<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    per_page: u8,
    page_delay: Duration,
}

impl<'a, A: GitHubApi + ?Sized> MemberResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            per_page: MAX_PER_PAGE,
            page_delay: Duration::ZERO,
        }
    }

    /// Set the page size (clamped to 1..=100)
    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Pause between consecutive member pages
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Resolve the union of all organizations' members
    ///
    /// Any failure aborts resolution: a partial member set would report
    /// members as outside contributors.
    pub async fn resolve(&self, orgs: &[String]) -> Result<MemberSet> {
        let mut members = MemberSet::new();

        for org in orgs {
            self.fetch_org(org, &mut members)
                .await
                .map_err(|e| Error::Members {
                    org: org.clone(),
                    source: Box::new(e),
                })?;

            info!(
                org = %org,
                total = members.len(),
                "Fetched organization members"
            );
        }

        Ok(members)
    }

    /// Page through one organization until a short page is returned
    async fn fetch_org(&self, org: &str, members: &mut MemberSet) -> Result<()> {
        let mut page = 1u32;
        loop {
            let logins = self.api.org_members_page(org, page, self.per_page).await?;
            let count = logins.len();
            debug!(org, page, count, "Received members page");

            members.extend(logins);

            if count < usize::from(self.per_page) {
                return Ok(());
            }

            page += 1;
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }
    }
}
