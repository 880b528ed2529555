use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use chrono::NaiveDate;
use reqwest::{
    Client, Method,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::issue::{Comment, IssueDetail, IssueSummary};
use crate::domain::ticket::{
    CreatedIssue, DUE_DATE_FORMAT, IssueType, Priority, TicketRequest, dedup_trimmed,
};
use crate::error::{AppError, AppResult};
use crate::infra::adf::{self, AdfDoc};
use crate::services::IssueTrackerService;

const SEARCH_FIELDS: &str = "summary,status,assignee,priority,created,updated,labels";

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(base_url: Option<String>, email: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira server URL not configured".to_string()))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn endpoint(base_url: &str, path: &str) -> String {
        format!("{}/rest/api/3/{path}", base_url.trim_end_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> AppResult<reqwest::RequestBuilder> {
        let (base_url, email, token) = self.api_details()?;
        Ok(self
            .http
            .request(method, Self::endpoint(base_url, path))
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json"))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }
        Ok(response)
    }
}

pub fn browse_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn create_issue(
        &self,
        project_key: &str,
        request: &TicketRequest,
    ) -> AppResult<CreatedIssue> {
        let project_key = project_key.trim();
        if project_key.is_empty() {
            return Err(AppError::IssueTracker(
                "project key must not be empty".to_string(),
            ));
        }

        let body = create_issue_payload(project_key, request)?;
        debug!(project = project_key, "creating issue");

        let response = self
            .send(
                self.request(Method::POST, "issue")?
                    .header(CONTENT_TYPE, "application/json")
                    .json(&body),
            )
            .await?;

        let payload: CreateIssueResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        let (base_url, _, _) = self.api_details()?;
        let url = browse_url(base_url, &payload.key);
        Ok(CreatedIssue {
            key: payload.key,
            url: Some(url),
        })
    }

    async fn search_issues(&self, jql: &str, max_results: u32) -> AppResult<Vec<IssueSummary>> {
        debug!(%jql, max_results, "searching issues");
        let max_results = max_results.to_string();
        let response = self
            .send(self.request(Method::GET, "search")?.query(&[
                ("jql", jql),
                ("maxResults", max_results.as_str()),
                ("fields", SEARCH_FIELDS),
            ]))
            .await?;

        let payload: SearchResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        Ok(payload.issues.into_iter().map(issue_summary).collect())
    }

    async fn fetch_issue(&self, key: &str) -> AppResult<IssueDetail> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::IssueTracker(
                "issue key must not be empty".to_string(),
            ));
        }

        debug!(key, "fetching issue");
        let response = self
            .send(self.request(Method::GET, &format!("issue/{key}"))?)
            .await?;

        let payload: IssueBean = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        Ok(issue_detail(payload))
    }

    async fn add_watcher(&self, key: &str, account_id: &str) -> AppResult<()> {
        debug!(key, account_id, "adding watcher");
        self.send(
            self.request(Method::POST, &format!("issue/{key}/watchers"))?
                .header(CONTENT_TYPE, "application/json")
                .json(&account_id),
        )
        .await?;
        Ok(())
    }
}

/// Builds the issue-creation body for an already-validated request. Optional
/// fields stay off the wire entirely when the request omits them.
pub fn create_issue_payload(
    project_key: &str,
    request: &TicketRequest,
) -> AppResult<CreateIssueBody> {
    let summary = request
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Template("summary is required".to_string()))?;

    let issue_type = request
        .issuetype
        .as_deref()
        .and_then(IssueType::from_str)
        .ok_or_else(|| AppError::Template("issue type is required".to_string()))?;

    let priority = match request.priority.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(name) => Some(Priority::from_str(name).ok_or_else(|| {
            AppError::Template(format!("unknown priority `{name}`"))
        })?),
        None => None,
    };

    let duedate = match request.due_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT).map_err(|_| {
                AppError::Template(format!("due date `{raw}` is not a valid YYYY-MM-DD date"))
            })?;
            Some(date.format(DUE_DATE_FORMAT).to_string())
        }
        None => None,
    };

    let mut custom = serde_json::Map::new();
    for (key, value) in &request.custom_fields {
        let json = serde_json::to_value(value).map_err(|err| {
            AppError::Template(format!("custom field {key} is not representable as JSON: {err}"))
        })?;
        custom.insert(key.clone(), json);
    }

    Ok(CreateIssueBody {
        fields: IssueFields {
            project: ProjectRef {
                key: project_key.to_string(),
            },
            issuetype: NameRef {
                name: issue_type.as_str().to_string(),
            },
            summary: summary.to_string(),
            description: adf_field(request.description.as_deref()),
            priority: priority.map(|p| NameRef {
                name: p.as_str().to_string(),
            }),
            assignee: request
                .assignee
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(|id| IdRef { id: id.to_string() }),
            labels: dedup_trimmed(&request.labels),
            components: name_refs(&request.components),
            fix_versions: name_refs(&request.fix_versions),
            duedate,
            environment: adf_field(request.environment.as_deref()),
            custom,
        },
    })
}

fn adf_field(text: Option<&str>) -> Option<AdfDoc> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(adf::text_to_doc)
}

fn name_refs(values: &[String]) -> Vec<NameRef> {
    dedup_trimmed(values)
        .into_iter()
        .map(|name| NameRef { name })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CreateIssueBody {
    fields: IssueFields,
}

#[derive(Debug, Serialize)]
struct IssueFields {
    project: ProjectRef,
    issuetype: NameRef,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<AdfDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<NameRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<IdRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    components: Vec<NameRef>,
    #[serde(rename = "fixVersions", skip_serializing_if = "Vec::is_empty")]
    fix_versions: Vec<NameRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duedate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<AdfDoc>,
    #[serde(flatten)]
    custom: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ProjectRef {
    key: String,
}

#[derive(Debug, Serialize)]
struct NameRef {
    name: String,
}

#[derive(Debug, Serialize)]
struct IdRef {
    id: String,
}

#[derive(Deserialize)]
struct CreateIssueResponse {
    key: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<IssueBean>,
}

#[derive(Deserialize)]
struct IssueBean {
    key: String,
    #[serde(default)]
    fields: IssueBeanFields,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct IssueBeanFields {
    summary: Option<String>,
    status: Option<NamedField>,
    priority: Option<NamedField>,
    issuetype: Option<NamedField>,
    creator: Option<UserField>,
    assignee: Option<UserField>,
    reporter: Option<UserField>,
    created: Option<String>,
    updated: Option<String>,
    labels: Option<Vec<String>>,
    components: Option<Vec<NamedField>>,
    #[serde(rename = "fixVersions")]
    fix_versions: Option<Vec<NamedField>>,
    description: Option<serde_json::Value>,
    comment: Option<CommentContainer>,
}

#[derive(Deserialize)]
struct NamedField {
    name: String,
}

#[derive(Deserialize)]
struct UserField {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct CommentContainer {
    #[serde(default)]
    comments: Vec<CommentBean>,
}

#[derive(Deserialize)]
struct CommentBean {
    author: Option<UserField>,
    created: Option<String>,
    body: Option<serde_json::Value>,
}

fn issue_summary(bean: IssueBean) -> IssueSummary {
    let fields = bean.fields;
    IssueSummary {
        key: bean.key,
        summary: fields.summary.unwrap_or_default(),
        status: fields.status.map(|s| s.name).unwrap_or_default(),
        assignee: fields.assignee.and_then(|u| u.display_name),
        priority: fields.priority.map(|p| p.name),
        created: fields.created.unwrap_or_default(),
        updated: fields.updated.unwrap_or_default(),
        labels: fields.labels.unwrap_or_default(),
    }
}

fn issue_detail(bean: IssueBean) -> IssueDetail {
    let fields = bean.fields;
    IssueDetail {
        key: bean.key,
        summary: fields.summary.unwrap_or_default(),
        status: fields.status.map(|s| s.name).unwrap_or_default(),
        priority: fields.priority.map(|p| p.name),
        issue_type: fields.issuetype.map(|t| t.name),
        creator: fields.creator.and_then(|u| u.display_name),
        assignee: fields.assignee.and_then(|u| u.display_name),
        reporter: fields.reporter.and_then(|u| u.display_name),
        created: fields.created.unwrap_or_default(),
        updated: fields.updated.unwrap_or_default(),
        labels: fields.labels.unwrap_or_default(),
        components: fields
            .components
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.name)
            .collect(),
        fix_versions: fields
            .fix_versions
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.name)
            .collect(),
        description: fields
            .description
            .map(|d| adf::doc_to_text(&d))
            .unwrap_or_default(),
        comments: fields
            .comment
            .map(|container| {
                container
                    .comments
                    .into_iter()
                    .map(|comment| Comment {
                        author: comment.author.and_then(|u| u.display_name),
                        created: comment.created,
                        body: comment.body.map(|b| adf::doc_to_text(&b)).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}
