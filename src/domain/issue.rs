use chrono::NaiveDateTime;

/// One row of a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub created: String,
    pub updated: String,
    pub labels: Vec<String>,
}

/// Everything the `view` command renders for a single issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetail {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: Option<String>,
    pub issue_type: Option<String>,
    pub creator: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub created: String,
    pub updated: String,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub fix_versions: Vec<String>,
    pub description: String,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: Option<String>,
    pub created: Option<String>,
    pub body: String,
}

/// Tracker timestamps look like `2024-05-01T09:30:12.000+0000`; render them
/// as `2024-05-01 09:30`, falling back to the raw value when the shape is off.
pub fn short_timestamp(raw: &str) -> String {
    raw.get(..19)
        .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn short_date(raw: &str) -> String {
    raw.split('T').next().unwrap_or(raw).to_string()
}
