//! Bot account detection
//!
//! Two populations of automation accounts show up as PR authors: accounts
//! the caller names explicitly (service users that look like people), and
//! GitHub App accounts, which the platform marks with a `[bot]` suffix.
//! [`BotDetection`] selects which of the two checks apply.

use std::collections::HashSet;

/// Marker GitHub appends to App-authored account logins
pub const BOT_MARKER: &str = "[bot]";

/// Strategy for recognising bot authors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BotDetection {
    /// Exact match against the configured exclusion list
    List,
    /// Login contains the platform bot marker
    Marker,
    /// Either of the above
    #[default]
    Both,
}

impl BotDetection {
    fn uses_list(self) -> bool {
        matches!(self, BotDetection::List | BotDetection::Both)
    }

    fn uses_marker(self) -> bool {
        matches!(self, BotDetection::Marker | BotDetection::Both)
    }
}

/// Bot exclusion policy for a run
#[derive(Debug, Clone, Default)]
pub struct BotPolicy {
    detection: BotDetection,
    include_bots: bool,
    excluded: HashSet<String>,
}

impl BotPolicy {
    /// Create a policy; empty logins in `excluded` are ignored
    pub fn new<I, S>(detection: BotDetection, include_bots: bool, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let excluded = excluded
            .into_iter()
            .map(Into::into)
            .filter(|login: &String| !login.is_empty())
            .collect();

        Self {
            detection,
            include_bots,
            excluded,
        }
    }

    /// Check whether an author is recognised as a bot under this strategy
    pub fn is_bot(&self, author: &str) -> bool {
        if author.is_empty() {
            return false;
        }

        (self.detection.uses_list() && self.excluded.contains(author))
            || (self.detection.uses_marker() && author.contains(BOT_MARKER))
    }

    /// Check whether a PR by this author is dropped from the report
    pub fn excludes(&self, author: &str) -> bool {
        !self.include_bots && self.is_bot(author)
    }
}
