//! GitHub GraphQL API support: pull request listing and ProjectV2 access

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use triage_core::BOT_MARKER;

use crate::api::{PullRequestPage, RawPullRequest};
use crate::{Error, GitHubClient, Result};

/// Maximum page size GraphQL connections accept
const PAGE_SIZE: u32 = 100;

const OPEN_PULL_REQUESTS_QUERY: &str = r#"
    query($owner: String!, $repo: String!, $first: Int!, $cursor: String) {
        repository(owner: $owner, name: $repo) {
            pullRequests(first: $first, after: $cursor, states: OPEN) {
                nodes {
                    number
                    title
                    url
                    createdAt
                    author {
                        __typename
                        login
                    }
                }
                pageInfo {
                    endCursor
                    hasNextPage
                }
            }
        }
    }
"#;

const PROJECT_ID_QUERY: &str = r#"
    query($owner: String!, $number: Int!) {
        organization(login: $owner) {
            projectV2(number: $number) {
                id
            }
        }
    }
"#;

const PULL_REQUEST_ID_QUERY: &str = r#"
    query($owner: String!, $repo: String!, $number: Int!) {
        repository(owner: $owner, name: $repo) {
            pullRequest(number: $number) {
                id
            }
        }
    }
"#;

const PROJECT_ITEMS_QUERY: &str = r#"
    query($projectId: ID!, $first: Int!) {
        node(id: $projectId) {
            ... on ProjectV2 {
                items(first: $first) {
                    nodes {
                        content {
                            ... on PullRequest {
                                id
                            }
                        }
                    }
                }
            }
        }
    }
"#;

const ADD_PROJECT_ITEM_MUTATION: &str = r#"
    mutation($projectId: ID!, $contentId: ID!) {
        addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) {
            item {
                id
            }
        }
    }
"#;

/// GraphQL query response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error
#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OpenPullRequests {
    repository: Option<PullRequestsRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestsRepository {
    pull_requests: PullRequestConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestConnection {
    nodes: Vec<PullRequestNode>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    title: String,
    url: String,
    created_at: String,
    author: Option<Actor>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct ProjectLookup {
    organization: Option<ProjectOwner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectOwner {
    project_v2: Option<NodeId>,
}

#[derive(Debug, Deserialize)]
struct NodeId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestLookup {
    repository: Option<PullRequestRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestRepository {
    pull_request: Option<NodeId>,
}

#[derive(Debug, Deserialize)]
struct ProjectItems {
    node: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    items: Option<ItemConnection>,
}

#[derive(Debug, Deserialize)]
struct ItemConnection {
    nodes: Vec<ProjectItem>,
}

#[derive(Debug, Deserialize)]
struct ProjectItem {
    content: Option<ItemContent>,
}

/// Item content; `id` is absent for anything other than a pull request
#[derive(Debug, Deserialize)]
struct ItemContent {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddProjectItem {
    add_project_v2_item_by_id: AddedItem,
}

#[derive(Debug, Deserialize)]
struct AddedItem {
    item: Option<NodeId>,
}

/// Login as the REST API reports it: App accounts carry the `[bot]` marker,
/// deleted accounts become the empty string.
fn author_login(author: Option<Actor>) -> String {
    match author {
        None => String::new(),
        Some(actor) => {
            let is_bot = actor.typename.as_deref() == Some("Bot");
            if is_bot && !actor.login.ends_with(BOT_MARKER) {
                format!("{}{}", actor.login, BOT_MARKER)
            } else {
                actor.login
            }
        }
    }
}

impl From<PullRequestNode> for RawPullRequest {
    fn from(node: PullRequestNode) -> Self {
        RawPullRequest {
            number: node.number,
            title: node.title,
            url: node.url,
            author: author_login(node.author),
            created_at: node.created_at,
        }
    }
}

fn into_page(owner: &str, repo: &str, data: OpenPullRequests) -> Result<PullRequestPage> {
    let connection = data
        .repository
        .ok_or_else(|| Error::RepoNotFound(format!("{}/{}", owner, repo)))?
        .pull_requests;

    Ok(PullRequestPage {
        nodes: connection.nodes.into_iter().map(RawPullRequest::from).collect(),
        end_cursor: connection.page_info.end_cursor,
        has_next_page: connection.page_info.has_next_page,
    })
}

fn content_ids(project_id: &str, data: ProjectItems) -> Result<Vec<String>> {
    let items = data
        .node
        .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?
        .items
        .ok_or_else(|| Error::ProjectNotFound(format!("{} is not a ProjectV2", project_id)))?;

    Ok(items
        .nodes
        .into_iter()
        .filter_map(|item| item.content.and_then(|c| c.id))
        .collect())
}

impl GitHubClient {
    pub(crate) async fn query_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage> {
        debug!(owner, repo, ?cursor, "Fetching open pull requests page via GraphQL");

        let variables = json!({
            "owner": owner,
            "repo": repo,
            "first": PAGE_SIZE,
            "cursor": cursor,
        });

        let data = self
            .graphql_query::<OpenPullRequests>(OPEN_PULL_REQUESTS_QUERY, &variables)
            .await?;

        into_page(owner, repo, data)
    }

    pub(crate) async fn query_project_id(&self, owner: &str, number: u64) -> Result<String> {
        debug!(owner, number, "Resolving project ID via GraphQL");

        let variables = json!({ "owner": owner, "number": number });
        let data = self
            .graphql_query::<ProjectLookup>(PROJECT_ID_QUERY, &variables)
            .await?;

        data.organization
            .and_then(|org| org.project_v2)
            .map(|project| project.id)
            .ok_or_else(|| Error::ProjectNotFound(format!("{} #{}", owner, number)))
    }

    pub(crate) async fn query_pull_request_id(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String> {
        debug!(owner, repo, number, "Resolving pull request ID via GraphQL");

        let variables = json!({ "owner": owner, "repo": repo, "number": number });
        let data = self
            .graphql_query::<PullRequestLookup>(PULL_REQUEST_ID_QUERY, &variables)
            .await?;

        data.repository
            .ok_or_else(|| Error::RepoNotFound(format!("{}/{}", owner, repo)))?
            .pull_request
            .map(|pr| pr.id)
            .ok_or(Error::PrNotFound(number))
    }

    pub(crate) async fn query_project_item_content_ids(
        &self,
        project_id: &str,
    ) -> Result<Vec<String>> {
        debug!(project_id, "Listing project items via GraphQL");

        let variables = json!({ "projectId": project_id, "first": PAGE_SIZE });
        let data = self
            .graphql_query::<ProjectItems>(PROJECT_ITEMS_QUERY, &variables)
            .await?;

        content_ids(project_id, data)
    }

    pub(crate) async fn mutate_add_project_item(
        &self,
        project_id: &str,
        content_id: &str,
    ) -> Result<String> {
        debug!(project_id, content_id, "Adding project item via GraphQL");

        let variables = json!({ "projectId": project_id, "contentId": content_id });
        let data = self
            .graphql_query::<AddProjectItem>(ADD_PROJECT_ITEM_MUTATION, &variables)
            .await?;

        data.add_project_v2_item_by_id
            .item
            .map(|item| item.id)
            .ok_or_else(|| Error::GraphQl("addProjectV2ItemById returned no item".to_string()))
    }

    /// Execute a GraphQL query
    async fn graphql_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &serde_json::Value,
    ) -> Result<T> {
        let request_body = json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .http()
            .post(self.graphql_url().clone())
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::GraphQl(format!(
                "request failed with status {}: {}",
                status, text
            )));
        }

        let body = response.text().await?;
        decode_response(&body)
    }
}

fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let graphql_response: GraphQLResponse<T> = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Failed to parse GraphQL response: {}", e)))?;

    if let Some(errors) = graphql_response.errors {
        if !errors.is_empty() {
            let error_messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GraphQl(error_messages.join(", ")));
        }
    }

    graphql_response
        .data
        .ok_or_else(|| Error::GraphQl("response missing data".to_string()))
}
