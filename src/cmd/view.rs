use clap::Args;

use crate::context::AppContext;
use crate::domain::issue::{IssueDetail, short_date};
use crate::error::{AppError, AppResult};
use crate::infra::jira::browse_url;

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Issue key (e.g. PROJ-123).
    pub key: String,
    /// Print the browse URL instead of rendering the issue.
    #[arg(long)]
    pub web: bool,
}

pub async fn run(ctx: &AppContext, args: ViewArgs) -> AppResult<()> {
    if args.web {
        let server = ctx.config.server.as_deref().ok_or_else(|| {
            AppError::Configuration("Jira server URL not configured".to_string())
        })?;
        println!("{}", browse_url(server, &args.key));
        return Ok(());
    }

    let issue = ctx.issue_tracker.fetch_issue(&args.key).await?;
    print!("{}", format_issue_markdown(&issue));
    Ok(())
}

fn format_issue_markdown(issue: &IssueDetail) -> String {
    let mut out = format!("# {}: {}\n\n", issue.key, issue.summary);
    out.push_str("## Metadata\n\n");

    let mut issue_meta = Vec::new();
    push_field(&mut issue_meta, "Status", nonempty(&issue.status));
    push_field(&mut issue_meta, "Priority", issue.priority.as_deref());
    push_field(&mut issue_meta, "Type", issue.issue_type.as_deref());
    let labels = issue.labels.join(", ");
    push_field(&mut issue_meta, "Labels", nonempty(&labels));
    let components = issue.components.join(", ");
    push_field(&mut issue_meta, "Components", nonempty(&components));
    let versions = issue.fix_versions.join(", ");
    push_field(&mut issue_meta, "Fix versions", nonempty(&versions));

    let mut user_meta = Vec::new();
    push_field(&mut user_meta, "Creator", issue.creator.as_deref());
    push_field(&mut user_meta, "Assignee", issue.assignee.as_deref());
    push_field(&mut user_meta, "Reporter", issue.reporter.as_deref());

    let mut date_meta = Vec::new();
    let created = short_date(&issue.created);
    push_field(&mut date_meta, "Created", nonempty(&created));
    let updated = short_date(&issue.updated);
    push_field(&mut date_meta, "Updated", nonempty(&updated));

    for group in [issue_meta, user_meta, date_meta] {
        if !group.is_empty() {
            out.push_str(&group.join("\n"));
            out.push_str("\n\n");
        }
    }

    if !issue.description.is_empty() {
        out.push_str("## Description\n\n");
        out.push_str(&issue.description);
        out.push_str("\n\n");
    }

    if !issue.comments.is_empty() {
        out.push_str("## Comments\n\n");
        for comment in &issue.comments {
            let author = comment.author.as_deref().unwrap_or("Unknown");
            let created = comment
                .created
                .as_deref()
                .map(short_date)
                .unwrap_or_else(|| "Unknown date".to_string());
            out.push_str(&format!("### {author} - {created}\n\n"));
            out.push_str(&comment.body);
            out.push_str("\n\n---\n\n");
        }
    }

    out
}

fn push_field(target: &mut Vec<String>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        target.push(format!("**{key}:** {value}"));
    }
}

fn nonempty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use crate::domain::issue::Comment;

    use super::*;

    fn sample_issue() -> IssueDetail {
        IssueDetail {
            key: "PROJ-7".to_string(),
            summary: "Login page crashes".to_string(),
            status: "In Progress".to_string(),
            priority: Some("High".to_string()),
            issue_type: Some("Bug".to_string()),
            creator: Some("Ada".to_string()),
            assignee: None,
            reporter: Some("Ada".to_string()),
            created: "2024-05-01T09:30:12.000+0000".to_string(),
            updated: "2024-05-02T10:00:00.000+0000".to_string(),
            labels: vec!["crash".to_string(), "auth".to_string()],
            components: Vec::new(),
            fix_versions: Vec::new(),
            description: "Steps to reproduce.".to_string(),
            comments: vec![Comment {
                author: Some("Grace".to_string()),
                created: Some("2024-05-03T08:00:00.000+0000".to_string()),
                body: "Can reproduce on main.".to_string(),
            }],
        }
    }

    #[test]
    fn renders_header_metadata_and_comments() {
        let markdown = format_issue_markdown(&sample_issue());
        assert!(markdown.starts_with("# PROJ-7: Login page crashes\n"));
        assert!(markdown.contains("**Status:** In Progress"));
        assert!(markdown.contains("**Labels:** crash, auth"));
        assert!(markdown.contains("**Created:** 2024-05-01"));
        assert!(markdown.contains("## Description"));
        assert!(markdown.contains("### Grace - 2024-05-03"));
        // Unset fields leave no trace.
        assert!(!markdown.contains("**Assignee:**"));
        assert!(!markdown.contains("**Components:**"));
    }

    #[test]
    fn skips_empty_sections() {
        let mut issue = sample_issue();
        issue.description = String::new();
        issue.comments.clear();
        let markdown = format_issue_markdown(&issue);
        assert!(!markdown.contains("## Description"));
        assert!(!markdown.contains("## Comments"));
    }
}
