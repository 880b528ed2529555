use clap::Args;

use crate::context::AppContext;
use crate::domain::issue::{IssueSummary, short_timestamp};
use crate::error::AppResult;

const SUMMARY_WIDTH: usize = 50;

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Raw JQL; overrides all filter flags.
    #[arg(long)]
    pub jql: Option<String>,
    /// Maximum number of issues to display.
    #[arg(long)]
    pub max: Option<u32>,
    /// Show only issues assigned to me.
    #[arg(long)]
    pub my_issues: bool,
    /// Show only issues reported by me.
    #[arg(long)]
    pub my_reported: bool,
    /// Filter by project key.
    #[arg(short, long)]
    pub project: Option<String>,
    /// Comma separated list of statuses (e.g. "To Do, In Progress").
    #[arg(long)]
    pub status: Option<String>,
    /// Comma separated list of statuses to exclude (e.g. "Done, Resolved").
    #[arg(long)]
    pub ne_status: Option<String>,
    /// Comma separated list of labels (e.g. "bug, enhancement").
    #[arg(long)]
    pub labels: Option<String>,
}

pub async fn run(ctx: &AppContext, args: ListArgs) -> AppResult<()> {
    let max = args.max.unwrap_or(ctx.config.max_results);
    let jql = build_jql(&args, ctx.config.default_project.as_deref());

    let issues = ctx.issue_tracker.search_issues(&jql, max).await?;
    if issues.is_empty() {
        eprintln!("No issues found matching your criteria.");
    }

    print!("{}", render_table(&issues));
    eprintln!("\nTotal issues: {}", issues.len());
    Ok(())
}

fn build_jql(args: &ListArgs, default_project: Option<&str>) -> String {
    if let Some(jql) = &args.jql {
        return jql.clone();
    }

    let mut parts = Vec::new();
    if args.my_issues {
        parts.push("assignee = currentUser()".to_string());
    }
    if args.my_reported {
        parts.push("reporter = currentUser()".to_string());
    }
    if let Some(project) = args.project.as_deref().or(default_project) {
        parts.push(format!("project = {project}"));
    }
    if let Some(statuses) = &args.status {
        parts.push(format!("status IN ({})", quoted_list(statuses)));
    }
    if let Some(statuses) = &args.ne_status {
        parts.push(format!("status NOT IN ({})", quoted_list(statuses)));
    }
    if let Some(labels) = &args.labels {
        parts.push(format!("labels IN ({})", quoted_list(labels)));
    }

    if parts.is_empty() {
        return "assignee = currentUser() ORDER BY created DESC".to_string();
    }
    format!("{} ORDER BY created DESC", parts.join(" AND "))
}

fn quoted_list(csv: &str) -> String {
    csv.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_table(issues: &[IssueSummary]) -> String {
    let headers = [
        "Key", "Created", "Updated", "Assignee", "Status", "Priority", "Summary", "Labels",
    ];
    let rows: Vec<[String; 8]> = issues
        .iter()
        .map(|issue| {
            [
                issue.key.clone(),
                short_timestamp(&issue.created),
                short_timestamp(&issue.updated),
                issue
                    .assignee
                    .clone()
                    .unwrap_or_else(|| "Unassigned".to_string()),
                issue.status.clone(),
                issue.priority.clone().unwrap_or_else(|| "N/A".to_string()),
                shorten(&issue.summary, SUMMARY_WIDTH),
                issue.labels.join(", "),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(&headers.map(str::to_string), &widths));
    out.push_str(&format_row(&widths.map(|w| "-".repeat(w)), &widths));
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row(cells: &[String; 8], widths: &[usize; 8]) -> String {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        // Pad all but the last column.
        if index < cells.len() - 1 {
            for _ in cell.chars().count()..*width {
                line.push(' ');
            }
        }
    }
    line.push('\n');
    line
}

fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let prefix: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_jql_targets_current_user() {
        let jql = build_jql(&ListArgs::default(), None);
        assert_eq!(jql, "assignee = currentUser() ORDER BY created DESC");
    }

    #[test]
    fn combines_filters_in_order() {
        let args = ListArgs {
            my_issues: true,
            status: Some("To Do, In Progress".to_string()),
            labels: Some("bug".to_string()),
            ..ListArgs::default()
        };
        let jql = build_jql(&args, Some("PROJ"));
        assert_eq!(
            jql,
            "assignee = currentUser() AND project = PROJ AND \
             status IN (\"To Do\", \"In Progress\") AND labels IN (\"bug\") \
             ORDER BY created DESC"
        );
    }

    #[test]
    fn explicit_jql_wins() {
        let args = ListArgs {
            jql: Some("project = X".to_string()),
            my_issues: true,
            ..ListArgs::default()
        };
        assert_eq!(build_jql(&args, Some("PROJ")), "project = X");
    }

    #[test]
    fn project_flag_overrides_default() {
        let args = ListArgs {
            project: Some("OTHER".to_string()),
            ..ListArgs::default()
        };
        assert_eq!(
            build_jql(&args, Some("PROJ")),
            "project = OTHER ORDER BY created DESC"
        );
    }

    #[test]
    fn excluded_statuses_use_not_in() {
        let args = ListArgs {
            ne_status: Some("Done,Resolved".to_string()),
            ..ListArgs::default()
        };
        assert_eq!(
            build_jql(&args, None),
            "status NOT IN (\"Done\", \"Resolved\") ORDER BY created DESC"
        );
    }

    #[test]
    fn shortens_long_summaries() {
        assert_eq!(shorten("short", 50), "short");
        let long = "a".repeat(60);
        let shortened = shorten(&long, 50);
        assert_eq!(shortened.chars().count(), 50);
        assert!(shortened.ends_with("..."));
    }

    #[test]
    fn renders_aligned_columns() {
        let issues = vec![IssueSummary {
            key: "PROJ-1".to_string(),
            summary: "Fix the flaky login test".to_string(),
            status: "In Progress".to_string(),
            assignee: None,
            priority: Some("High".to_string()),
            created: "2024-05-01T09:30:12.000+0000".to_string(),
            updated: "2024-05-02T10:00:00.000+0000".to_string(),
            labels: vec!["ci".to_string()],
        }];
        let table = render_table(&issues);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Key"));
        assert!(lines[2].contains("PROJ-1"));
        assert!(lines[2].contains("2024-05-01 09:30"));
        assert!(lines[2].contains("Unassigned"));
    }
}
