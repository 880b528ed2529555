use async_trait::async_trait;

use crate::domain::issue::{IssueDetail, IssueSummary};
use crate::domain::ticket::{CreatedIssue, TicketRequest};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_issue(
        &self,
        project_key: &str,
        request: &TicketRequest,
    ) -> AppResult<CreatedIssue>;
    async fn search_issues(&self, jql: &str, max_results: u32) -> AppResult<Vec<IssueSummary>>;
    async fn fetch_issue(&self, key: &str) -> AppResult<IssueDetail>;
    async fn add_watcher(&self, key: &str, account_id: &str) -> AppResult<()>;
}
