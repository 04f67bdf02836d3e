//! Run configuration for pr-triage
//!
//! Configuration is resolved with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (PR_TRIAGE_*, merged by the CLI parser)
//! 3. Default values
//!
//! There is no config file; each run is self-contained.

use std::time::Duration;

use url::Url;

use crate::{BotDetection, BotPolicy, Error, Result, SortOrder};

/// Default GitHub API root
pub const DEFAULT_API_URL: &str = "https://api.github.com/";

/// Maximum page size accepted by the GitHub REST API
pub const MAX_PER_PAGE: u8 = 100;

/// Settings for a single run
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository owner (also the organization that owns the project board)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Organizations whose members are not outside contributors
    pub orgs: Vec<String>,
    /// Report bot-authored PRs too
    pub include_bots: bool,
    /// Explicit bot logins to exclude
    pub bots_to_exclude: Vec<String>,
    /// How bots are recognised
    pub bot_detection: BotDetection,
    /// Report ordering by creation time
    pub sort: SortOrder,
    /// Add surviving PRs to the project board
    pub add_to_project: bool,
    /// Project board number
    pub project_number: u64,
    /// GitHub API root, e.g. for GitHub Enterprise
    pub api_url: Url,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// Fixed pause between organization member pages
    pub member_page_delay: Duration,
    /// Page size for member listing
    pub members_per_page: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: "rancher".to_string(),
            repo: "rancher".to_string(),
            orgs: vec!["rancher".to_string(), "SUSE".to_string()],
            include_bots: false,
            bots_to_exclude: Vec::new(),
            bot_detection: BotDetection::default(),
            sort: SortOrder::default(),
            add_to_project: false,
            project_number: 79,
            // Constant URL, parsing cannot fail
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            request_timeout: Duration::from_secs(15),
            member_page_delay: Duration::ZERO,
            members_per_page: MAX_PER_PAGE,
        }
    }
}

/// Values supplied on the command line; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub orgs: Option<String>,
    pub include_bots: Option<bool>,
    pub bots_to_exclude: Option<String>,
    pub bot_detection: Option<BotDetection>,
    pub sort: Option<SortOrder>,
    pub add_to_project: Option<bool>,
    pub project_number: Option<u64>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub member_page_delay_ms: Option<u64>,
}

impl Config {
    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(owner) = overrides.owner {
            self.owner = owner.trim().to_string();
        }
        if let Some(repo) = overrides.repo {
            self.repo = repo.trim().to_string();
        }
        if let Some(orgs) = overrides.orgs {
            self.orgs = split_list(&orgs);
        }
        if let Some(include_bots) = overrides.include_bots {
            self.include_bots = include_bots;
        }
        if let Some(bots) = overrides.bots_to_exclude {
            self.bots_to_exclude = split_list(&bots);
        }
        if let Some(detection) = overrides.bot_detection {
            self.bot_detection = detection;
        }
        if let Some(sort) = overrides.sort {
            self.sort = sort;
        }
        if let Some(add) = overrides.add_to_project {
            self.add_to_project = add;
        }
        if let Some(number) = overrides.project_number {
            self.project_number = number;
        }
        if let Some(api_url) = overrides.api_url {
            self.api_url = parse_api_url(&api_url)?;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = overrides.member_page_delay_ms {
            self.member_page_delay = Duration::from_millis(ms);
        }

        Ok(self)
    }

    /// Load configuration with overrides applied and validated
    pub fn load_with_overrides(overrides: ConfigOverrides) -> Result<Self> {
        let config = Self::default().with_cli_overrides(overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_empty() {
            return Err(Error::Config("Repository owner must not be empty".to_string()));
        }
        if self.repo.is_empty() {
            return Err(Error::Config("Repository name must not be empty".to_string()));
        }
        if self.orgs.is_empty() {
            return Err(Error::Config(
                "At least one organization is required".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("Request timeout must be positive".to_string()));
        }
        if self.members_per_page == 0 || self.members_per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "Member page size must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        Ok(())
    }

    /// Bot exclusion policy described by this configuration
    pub fn bot_policy(&self) -> BotPolicy {
        BotPolicy::new(
            self.bot_detection,
            self.include_bots,
            self.bots_to_exclude.iter().cloned(),
        )
    }

    /// GraphQL endpoint for the API root
    ///
    /// GitHub Enterprise serves REST under `/api/v3/` and GraphQL at
    /// `/api/graphql`; github.com serves both from the root.
    pub fn graphql_url(&self) -> Result<Url> {
        let relative = if self.api_url.path().ends_with("/v3/") {
            "../graphql"
        } else {
            "graphql"
        };
        self.api_url
            .join(relative)
            .map_err(|e| Error::Config(format!("Invalid GraphQL URL: {}", e)))
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an API root, making sure it ends with `/` so joins stay beneath it
fn parse_api_url(value: &str) -> Result<Url> {
    let mut value = value.trim().to_string();
    if !value.ends_with('/') {
        value.push('/');
    }
    let url = Url::parse(&value)
        .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", value, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("Invalid API URL '{}'", value)));
    }
    Ok(url)
}
