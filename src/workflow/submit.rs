use std::path::Path;

use tracing::debug;

use crate::context::AppContext;
use crate::domain::ticket::{CreatedIssue, TicketRequest, dedup_trimmed};
use crate::error::{AppError, AppResult};
use crate::infra::jira::create_issue_payload;

#[derive(Debug)]
pub enum SubmitOutcome {
    DryRun { payload: serde_json::Value },
    Created { issue: CreatedIssue, watchers_added: usize },
}

/// Loads a ticket request file, validates it, and either prints back the
/// payload (dry run) or creates the issue and adds the requested watchers.
pub async fn submit_ticket(
    ctx: &AppContext,
    path: &Path,
    project_override: Option<String>,
    dry_run: bool,
) -> AppResult<SubmitOutcome> {
    let mut request = TicketRequest::from_yaml_file(path)?;

    let fallback = project_override
        .as_deref()
        .or(ctx.config.default_project.as_deref());
    let errors = request.validate(fallback);
    if !errors.is_empty() {
        let details = errors
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(AppError::Template(format!(
            "{} failed validation: {details}",
            path.display()
        )));
    }

    let project = project_override
        .or_else(|| request.project.clone())
        .or_else(|| ctx.config.default_project.clone())
        .ok_or_else(|| AppError::Template("project key is required".to_string()))?;

    // An absent assignee falls back to the configured default; the tracker
    // auto-assigns when neither is set.
    if request
        .assignee
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .is_none()
    {
        request.assignee = ctx.config.default_assignee.clone();
    }

    if dry_run {
        let body = create_issue_payload(&project, &request)?;
        let payload = serde_json::to_value(&body)
            .map_err(|err| AppError::Template(format!("failed to encode payload: {err}")))?;
        return Ok(SubmitOutcome::DryRun { payload });
    }

    let issue = ctx.issue_tracker.create_issue(&project, &request).await?;
    debug!(key = %issue.key, "issue created");

    let mut watchers_added = 0;
    for watcher in dedup_trimmed(&request.watchers) {
        match ctx.issue_tracker.add_watcher(&issue.key, &watcher).await {
            Ok(()) => watchers_added += 1,
            Err(err) => eprintln!("Warning: failed to add watcher {watcher}: {err}"),
        }
    }

    Ok(SubmitOutcome::Created {
        issue,
        watchers_added,
    })
}
