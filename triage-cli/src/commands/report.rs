//! Report command - list outside contributions and sync them to a project

use std::io::Write;

use anyhow::Context;
use clap::{Args, ValueEnum};
use tracing::{info, warn};
use triage_core::{
    sort_pull_requests, BotDetection, Config, ConfigOverrides, ContributionFilter, Reporter,
    Secrets, SortOrder,
};
use triage_github::{
    fetch_open_pull_requests, resolve_project, GitHubApi, GitHubClient, MemberResolver,
    ProjectSyncer,
};

/// Report options; every flag can also be set through a PR_TRIAGE_* variable
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Repository owner [default: rancher]
    #[arg(long, env = "PR_TRIAGE_OWNER")]
    owner: Option<String>,

    /// Repository name [default: rancher]
    #[arg(long, env = "PR_TRIAGE_REPO")]
    repo: Option<String>,

    /// Comma-separated list of organizations [default: rancher,SUSE]
    #[arg(long, env = "PR_TRIAGE_ORGS")]
    orgs: Option<String>,

    /// Include PRs authored by bots
    #[arg(long = "includebots", env = "PR_TRIAGE_INCLUDE_BOTS")]
    include_bots: bool,

    /// Comma-separated list of bot logins to exclude
    #[arg(long = "botstoexclude", env = "PR_TRIAGE_BOTS_TO_EXCLUDE")]
    bots_to_exclude: Option<String>,

    /// How bot authors are recognised [default: both]
    #[arg(long, value_enum, env = "PR_TRIAGE_BOT_DETECTION")]
    bot_detection: Option<DetectionArg>,

    /// Order of the report by creation time [default: asc]
    #[arg(long, value_enum, env = "PR_TRIAGE_SORT")]
    sort: Option<SortArg>,

    /// Add matching PRs to the given project
    #[arg(long = "addtoproject", env = "PR_TRIAGE_ADD_TO_PROJECT")]
    add_to_project: bool,

    /// GitHub project number [default: 79]
    #[arg(long, env = "PR_TRIAGE_PROJECT")]
    project: Option<u64>,

    /// GitHub API root [default: https://api.github.com/]
    #[arg(long, env = "PR_TRIAGE_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds [default: 15]
    #[arg(long, value_name = "SECS", env = "PR_TRIAGE_TIMEOUT")]
    timeout: Option<u64>,

    /// Pause between organization member pages, in milliseconds [default: 0]
    #[arg(long, value_name = "MS", env = "PR_TRIAGE_MEMBER_PAGE_DELAY_MS")]
    member_page_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DetectionArg {
    /// Exact match against --botstoexclude
    List,
    /// Login carries the [bot] marker
    Marker,
    /// Either check
    Both,
}

impl From<DetectionArg> for BotDetection {
    fn from(arg: DetectionArg) -> Self {
        match arg {
            DetectionArg::List => BotDetection::List,
            DetectionArg::Marker => BotDetection::Marker,
            DetectionArg::Both => BotDetection::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Oldest first
    Asc,
    /// Newest first
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
        }
    }
}

/// Counts from a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Open pull requests fetched
    pub fetched: usize,
    /// Pull requests in the report
    pub reported: usize,
    /// Pull requests whose project sync failed
    pub sync_failures: usize,
}

impl ReportArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            orgs: self.orgs.clone(),
            include_bots: self.include_bots.then_some(true),
            bots_to_exclude: self.bots_to_exclude.clone(),
            bot_detection: self.bot_detection.map(Into::into),
            sort: self.sort.map(Into::into),
            add_to_project: self.add_to_project.then_some(true),
            project_number: self.project,
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout,
            member_page_delay_ms: self.member_page_delay_ms,
        }
    }

    /// Execute the report command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config =
            Config::load_with_overrides(self.overrides()).context("Invalid configuration")?;
        let secrets = Secrets::from_env()?;
        let client = GitHubClient::new(&config, &secrets)?;

        let stdout = std::io::stdout();
        let summary = run(&client, &config, stdout.lock()).await?;

        info!(
            fetched = summary.fetched,
            reported = summary.reported,
            sync_failures = summary.sync_failures,
            "Run complete"
        );
        Ok(())
    }
}

/// Resolve members, fetch and sort PRs, then report (and sync) survivors
pub async fn run<A, W>(api: &A, config: &Config, out: W) -> anyhow::Result<RunSummary>
where
    A: GitHubApi + ?Sized,
    W: Write,
{
    let project = if config.add_to_project {
        let project = resolve_project(api, &config.owner, config.project_number)
            .await
            .with_context(|| {
                format!(
                    "Failed to fetch project {} of {}",
                    config.project_number, config.owner
                )
            })?;
        Some(project)
    } else {
        None
    };

    let members = MemberResolver::new(api)
        .with_per_page(config.members_per_page)
        .with_page_delay(config.member_page_delay)
        .resolve(&config.orgs)
        .await
        .context("Failed to resolve organization members")?;

    let mut pull_requests = fetch_open_pull_requests(api, &config.owner, &config.repo)
        .await
        .with_context(|| format!("Error fetching PRs of {}/{}", config.owner, config.repo))?;
    sort_pull_requests(&mut pull_requests, config.sort);

    let filter = ContributionFilter::new(members, config.bot_policy());
    let syncer = project.map(|p| ProjectSyncer::new(api, p, &config.owner, &config.repo));

    let mut reporter = Reporter::new(out);
    reporter.header(&config.orgs)?;

    let mut sync_failures = 0;
    for pr in filter.apply(&pull_requests) {
        reporter.entry(pr)?;

        let Some(syncer) = &syncer else {
            continue;
        };
        match syncer.sync(pr.number).await {
            Ok(outcome) => {
                reporter.sync_outcome(pr.number, syncer.project().number, outcome)?;
            }
            Err(e) => {
                warn!(number = pr.number, error = %e, "Skipping project sync");
                sync_failures += 1;
            }
        }
    }

    let reported = reporter.finish()?;

    Ok(RunSummary {
        fetched: pull_requests.len(),
        reported,
        sync_failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use triage_github::{Error, PullRequestPage, RawPullRequest, Result};

    /// Single-page GitHub holding one organization, one repo and one board
    #[derive(Default)]
    struct StubGitHub {
        members: HashMap<String, Vec<String>>,
        pull_requests: Vec<RawPullRequest>,
        board: Option<String>,
        pr_ids: HashMap<u64, String>,
        items: Mutex<Vec<String>>,
    }

    impl StubGitHub {
        fn acme() -> Self {
            let pr = |number: u64, author: &str, created_at: &str| RawPullRequest {
                number,
                title: format!("Change {}", number),
                url: format!("https://github.com/acme/widgets/pull/{}", number),
                author: author.to_string(),
                created_at: created_at.to_string(),
            };

            Self {
                members: HashMap::from([(
                    "acme".to_string(),
                    vec!["alice".to_string(), "bob".to_string()],
                )]),
                pull_requests: vec![
                    pr(3, "bots-app[bot]", "2024-03-01T00:00:00Z"),
                    pr(1, "alice", "2024-01-01T00:00:00Z"),
                    pr(2, "carol", "2024-02-01T00:00:00Z"),
                    pr(4, "erin", "2023-12-01T00:00:00Z"),
                ],
                board: Some("PVT_acme".to_string()),
                pr_ids: HashMap::from([(2, "PR_2".to_string()), (3, "PR_3".to_string())]),
                items: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GitHubApi for StubGitHub {
        async fn org_members_page(&self, org: &str, page: u32, _per_page: u8) -> Result<Vec<String>> {
            let members = self
                .members
                .get(org)
                .ok_or_else(|| Error::GraphQl(format!("404 Not Found: {}", org)))?;
            Ok(if page == 1 { members.clone() } else { Vec::new() })
        }

        async fn open_pull_requests_page(
            &self,
            _owner: &str,
            _repo: &str,
            _cursor: Option<&str>,
        ) -> Result<PullRequestPage> {
            Ok(PullRequestPage {
                nodes: self.pull_requests.clone(),
                end_cursor: None,
                has_next_page: false,
            })
        }

        async fn project_id(&self, owner: &str, number: u64) -> Result<String> {
            self.board
                .clone()
                .ok_or_else(|| Error::ProjectNotFound(format!("{} #{}", owner, number)))
        }

        async fn pull_request_id(&self, _owner: &str, _repo: &str, number: u64) -> Result<String> {
            self.pr_ids.get(&number).cloned().ok_or(Error::PrNotFound(number))
        }

        async fn project_item_content_ids(&self, _project_id: &str) -> Result<Vec<String>> {
            Ok(self.items.lock().unwrap().clone())
        }

        async fn add_project_item(&self, _project_id: &str, content_id: &str) -> Result<String> {
            let mut items = self.items.lock().unwrap();
            items.push(content_id.to_string());
            Ok(format!("PVTI_{}", items.len()))
        }
    }

    fn acme_config() -> Config {
        Config {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            orgs: vec!["acme".to_string()],
            ..Default::default()
        }
    }

    async fn report(api: &StubGitHub, config: &Config) -> (RunSummary, String) {
        let mut out = Vec::new();
        let summary = run(api, config, &mut out).await.unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        report: ReportArgs,
    }

    #[tokio::test]
    async fn test_members_and_bots_left_out() {
        let (summary, output) = report(&StubGitHub::acme(), &acme_config()).await;

        assert!(output.contains("PR #2 by carol"));
        assert!(output.contains("PR #4 by erin"));
        assert!(!output.contains("PR #1 "));
        assert!(!output.contains("PR #3 "));
        assert_eq!(
            summary,
            RunSummary {
                fetched: 4,
                reported: 2,
                sync_failures: 0
            }
        );
    }

    #[tokio::test]
    async fn test_include_bots() {
        let config = Config {
            include_bots: true,
            ..acme_config()
        };
        let (summary, output) = report(&StubGitHub::acme(), &config).await;

        assert!(output.contains("PR #3 by bots-app[bot]"));
        assert_eq!(summary.reported, 3);
    }

    #[tokio::test]
    async fn test_report_is_oldest_first_by_default() {
        let config = Config {
            include_bots: true,
            ..acme_config()
        };
        let (_, output) = report(&StubGitHub::acme(), &config).await;

        let pos = |needle: &str| output.find(needle).unwrap();
        assert!(pos("PR #4 ") < pos("PR #2 "));
        assert!(pos("PR #2 ") < pos("PR #3 "));
    }

    #[tokio::test]
    async fn test_report_newest_first() {
        let config = Config {
            include_bots: true,
            sort: SortOrder::Desc,
            ..acme_config()
        };
        let (_, output) = report(&StubGitHub::acme(), &config).await;

        let pos = |needle: &str| output.find(needle).unwrap();
        assert!(pos("PR #3 ") < pos("PR #2 "));
        assert!(pos("PR #2 ") < pos("PR #4 "));
    }

    #[tokio::test]
    async fn test_second_sync_run_finds_items_present() {
        let api = StubGitHub::acme();
        let config = Config {
            add_to_project: true,
            project_number: 7,
            include_bots: true,
            ..acme_config()
        };

        let (first, output) = report(&api, &config).await;
        assert!(output.contains("PR #2 added to project 7"));
        assert!(output.contains("PR #3 added to project 7"));
        // #4 has no node ID in the stub: logged and skipped, run continues
        assert_eq!(first.sync_failures, 1);
        assert_eq!(first.reported, 3);

        let (_, output) = report(&api, &config).await;
        assert!(output.contains("PR #2 already in project 7"));
        assert!(output.contains("PR #3 already in project 7"));
        assert_eq!(*api.items.lock().unwrap(), vec!["PR_2", "PR_3"]);
    }

    #[tokio::test]
    async fn test_missing_project_is_fatal() {
        let api = StubGitHub {
            board: None,
            ..StubGitHub::acme()
        };
        let config = Config {
            add_to_project: true,
            ..acme_config()
        };

        let mut out = Vec::new();
        let err = run(&api, &config, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch project 79 of acme"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_org_is_fatal() {
        let config = Config {
            orgs: vec!["acme".to_string(), "nope".to_string()],
            ..acme_config()
        };

        let mut out = Vec::new();
        let err = run(&StubGitHub::acme(), &config, &mut out)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("nope"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_timestamp_is_fatal() {
        let mut api = StubGitHub::acme();
        api.pull_requests[0].created_at = "not-a-date".to_string();

        let mut out = Vec::new();
        let err = run(&api, &acme_config(), &mut out).await.unwrap_err();
        assert!(format!("{:#}", err).contains("not-a-date"));
    }

    #[test]
    fn test_parse_flags() {
        let cli = TestCli::parse_from([
            "pr-triage",
            "--owner",
            "acme",
            "--orgs",
            "acme,acme-labs",
            "--includebots",
            "--botstoexclude",
            "ci-user",
            "--addtoproject",
            "--project",
            "12",
            "--bot-detection",
            "list",
            "--sort",
            "desc",
        ]);
        let config = Config::load_with_overrides(cli.report.overrides()).unwrap();

        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "rancher");
        assert_eq!(config.orgs, vec!["acme", "acme-labs"]);
        assert!(config.include_bots);
        assert_eq!(config.bots_to_exclude, vec!["ci-user"]);
        assert!(config.add_to_project);
        assert_eq!(config.project_number, 12);
        assert_eq!(config.bot_detection, BotDetection::List);
        assert_eq!(config.sort, SortOrder::Desc);
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let overrides = ReportArgs::default().overrides();
        let config = Config::load_with_overrides(overrides).unwrap();

        assert_eq!(config.owner, "rancher");
        assert_eq!(config.orgs, vec!["rancher", "SUSE"]);
        assert!(!config.include_bots);
        assert!(!config.add_to_project);
        assert_eq!(config.project_number, 79);
    }
}
