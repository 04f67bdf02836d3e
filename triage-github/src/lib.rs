//! Triage GitHub - GitHub integration for pr-triage
//!
//! This crate talks to the GitHub REST and GraphQL APIs behind the
//! [`GitHubApi`] trait, and builds the three network stages of a run on top
//! of it: resolving organization members, fetching open pull requests, and
//! syncing pull requests to a project board.

mod api;
mod client;
mod error;
mod graphql;
mod members;
mod project;
mod pulls;

#[cfg(test)]
mod testing;

pub use api::{GitHubApi, PullRequestPage, RawPullRequest};
pub use client::GitHubClient;
pub use error::{Error, Result};
pub use members::MemberResolver;
pub use project::{resolve_project, ProjectSyncer, SyncStage};
pub use pulls::fetch_open_pull_requests;
