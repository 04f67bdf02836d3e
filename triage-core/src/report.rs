//! Plain-text report of outside contributions

use std::io::Write;

use crate::{PullRequest, Result, SyncOutcome};

const RULE: &str = "-------------------------------------------";

/// Writes the report one entry at a time so sync results follow their PR
pub struct Reporter<W: Write> {
    out: W,
    entries: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, entries: 0 }
    }

    /// Write the report heading naming the member organizations
    pub fn header(&mut self, orgs: &[String]) -> Result<()> {
        writeln!(self.out, "PRs created by users outside of [{}]:", orgs.join(", "))?;
        writeln!(self.out, "{}", RULE)?;
        Ok(())
    }

    /// Write one surviving pull request
    pub fn entry(&mut self, pr: &PullRequest) -> Result<()> {
        let author = if pr.author.is_empty() {
            "(deleted account)"
        } else {
            pr.author.as_str()
        };

        writeln!(self.out)?;
        writeln!(self.out, "PR #{} by {}", pr.number, author)?;
        writeln!(self.out, "Title: {}", pr.title)?;
        writeln!(self.out, "Link: {}", pr.url)?;
        self.entries += 1;
        Ok(())
    }

    /// Write the project sync result for the PR just reported
    pub fn sync_outcome(
        &mut self,
        pr_number: u64,
        project_number: u64,
        outcome: SyncOutcome,
    ) -> Result<()> {
        writeln!(self.out, "{}", outcome.describe(pr_number, project_number))?;
        Ok(())
    }

    /// Write the summary line and flush; returns the number of entries
    pub fn finish(mut self) -> Result<usize> {
        writeln!(self.out)?;
        match self.entries {
            0 => writeln!(self.out, "No pull requests from outside contributors.")?,
            1 => writeln!(self.out, "1 pull request from outside contributors")?,
            n => writeln!(self.out, "{} pull requests from outside contributors", n)?,
        }
        self.out.flush()?;
        Ok(self.entries)
    }
}
