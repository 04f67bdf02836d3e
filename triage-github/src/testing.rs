//! In-memory GitHub used by the stage tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{GitHubApi, PullRequestPage, RawPullRequest};
use crate::{Error, Result};

pub(crate) fn raw_pr(number: u64, author: &str, created_at: &str) -> RawPullRequest {
    RawPullRequest {
        number,
        title: format!("PR {}", number),
        url: format!("https://github.com/acme/widgets/pull/{}", number),
        author: author.to_string(),
        created_at: created_at.to_string(),
    }
}

#[derive(Default)]
pub(crate) struct FakeGitHub {
    orgs: HashMap<String, Vec<String>>,
    failing_member_pages: Vec<(String, u32)>,
    pull_requests: Vec<RawPullRequest>,
    pr_page_size: usize,
    fixed_pr_page: Option<PullRequestPage>,
    failing_pr_request: Option<usize>,
    projects: HashMap<(String, u64), String>,
    pr_ids: HashMap<u64, String>,
    fail_add: bool,
    items: Mutex<HashMap<String, Vec<String>>>,
    member_calls: Mutex<Vec<(String, u32)>>,
    pr_cursors: Mutex<Vec<Option<String>>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            pr_page_size: 100,
            ..Default::default()
        }
    }

    pub fn with_org(mut self, org: &str, logins: Vec<String>) -> Self {
        self.orgs.insert(org.to_string(), logins);
        self
    }

    pub fn fail_member_page(mut self, org: &str, page: u32) -> Self {
        self.failing_member_pages.push((org.to_string(), page));
        self
    }

    pub fn with_pull_requests(mut self, prs: Vec<RawPullRequest>, page_size: usize) -> Self {
        self.pull_requests = prs;
        self.pr_page_size = page_size;
        self
    }

    pub fn with_pull_request_page(mut self, page: PullRequestPage) -> Self {
        self.fixed_pr_page = Some(page);
        self
    }

    /// Fail the n-th (1-based) pull request page request
    pub fn fail_pull_request_page(mut self, request: usize) -> Self {
        self.failing_pr_request = Some(request);
        self
    }

    pub fn with_project(mut self, owner: &str, number: u64, id: &str) -> Self {
        self.projects
            .insert((owner.to_string(), number), id.to_string());
        self.items.lock().unwrap().entry(id.to_string()).or_default();
        self
    }

    pub fn with_pull_request_id(mut self, number: u64, id: &str) -> Self {
        self.pr_ids.insert(number, id.to_string());
        self
    }

    pub fn with_project_item(self, project_id: &str, content_id: &str) -> Self {
        self.items
            .lock()
            .unwrap()
            .entry(project_id.to_string())
            .or_default()
            .push(content_id.to_string());
        self
    }

    pub fn fail_add_item(mut self) -> Self {
        self.fail_add = true;
        self
    }

    /// Pages requested for an organization, in order
    pub fn member_requests(&self, org: &str) -> Vec<u32> {
        self.member_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, _)| o == org)
            .map(|(_, page)| *page)
            .collect()
    }

    /// Cursor passed with each pull request page request
    pub fn pull_request_cursors(&self) -> Vec<Option<String>> {
        self.pr_cursors.lock().unwrap().clone()
    }

    pub fn project_items(&self, project_id: &str) -> Vec<String> {
        self.items
            .lock()
            .unwrap()
            .get(project_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn org_members_page(&self, org: &str, page: u32, per_page: u8) -> Result<Vec<String>> {
        self.member_calls
            .lock()
            .unwrap()
            .push((org.to_string(), page));

        if self
            .failing_member_pages
            .iter()
            .any(|(o, p)| o == org && *p == page)
        {
            return Err(Error::GraphQl("502 Bad Gateway".to_string()));
        }

        let logins = self
            .orgs
            .get(org)
            .ok_or_else(|| Error::GraphQl(format!("404 Not Found: /orgs/{}/members", org)))?;

        let per_page = usize::from(per_page);
        let start = (page as usize - 1) * per_page;
        Ok(logins.iter().skip(start).take(per_page).cloned().collect())
    }

    async fn open_pull_requests_page(
        &self,
        _owner: &str,
        _repo: &str,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage> {
        let request = {
            let mut cursors = self.pr_cursors.lock().unwrap();
            cursors.push(cursor.map(str::to_string));
            cursors.len()
        };

        if self.failing_pr_request == Some(request) {
            return Err(Error::GraphQl("timeout".to_string()));
        }

        if let Some(page) = &self.fixed_pr_page {
            return Ok(page.clone());
        }

        let start: usize = match cursor {
            Some(c) => c
                .parse()
                .map_err(|_| Error::GraphQl(format!("bad cursor {}", c)))?,
            None => 0,
        };
        let end = (start + self.pr_page_size).min(self.pull_requests.len());

        Ok(PullRequestPage {
            nodes: self.pull_requests[start..end].to_vec(),
            end_cursor: Some(end.to_string()),
            has_next_page: end < self.pull_requests.len(),
        })
    }

    async fn project_id(&self, owner: &str, number: u64) -> Result<String> {
        self.projects
            .get(&(owner.to_string(), number))
            .cloned()
            .ok_or_else(|| Error::ProjectNotFound(format!("{} #{}", owner, number)))
    }

    async fn pull_request_id(&self, _owner: &str, _repo: &str, number: u64) -> Result<String> {
        self.pr_ids
            .get(&number)
            .cloned()
            .ok_or(Error::PrNotFound(number))
    }

    async fn project_item_content_ids(&self, project_id: &str) -> Result<Vec<String>> {
        self.items
            .lock()
            .unwrap()
            .get(project_id)
            .cloned()
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }

    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<String> {
        if self.fail_add {
            return Err(Error::GraphQl("Resource not accessible by integration".to_string()));
        }

        let mut items = self.items.lock().unwrap();
        let project = items
            .get_mut(project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?;
        project.push(content_id.to_string());
        Ok(format!("PVTI_{}", project.len()))
    }
}
