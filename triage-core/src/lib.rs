//! Triage Core - Core library for pr-triage
//!
//! This crate holds the run configuration and the rules that decide which
//! open pull requests count as outside contributions: membership, bot
//! detection, ordering and report rendering. It performs no network I/O.

pub mod bots;
pub mod config;
pub mod error;
pub mod filter;
pub mod members;
pub mod project;
pub mod pull_request;
pub mod report;
pub mod secrets;

pub use bots::{BotDetection, BotPolicy, BOT_MARKER};
pub use config::{split_list, Config, ConfigOverrides};
pub use error::{Error, Result};
pub use filter::ContributionFilter;
pub use members::MemberSet;
pub use project::{ProjectRef, SyncOutcome};
pub use pull_request::{parse_timestamp, sort_pull_requests, PullRequest, SortOrder};
pub use report::Reporter;
pub use secrets::Secrets;
