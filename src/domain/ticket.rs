use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::error::{AppError, AppResult};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
const SUMMARY_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    Bug,
    Task,
    Story,
    Epic,
    Subtask,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Bug => "Bug",
            IssueType::Task => "Task",
            IssueType::Story => "Story",
            IssueType::Epic => "Epic",
            IssueType::Subtask => "Sub-task",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "bug" => Some(IssueType::Bug),
            "task" => Some(IssueType::Task),
            "story" => Some(IssueType::Story),
            "epic" => Some(IssueType::Epic),
            "sub-task" | "subtask" => Some(IssueType::Subtask),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Highest => "Highest",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Lowest => "Lowest",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "highest" => Some(Priority::Highest),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            "lowest" => Some(Priority::Lowest),
            _ => None,
        }
    }
}

/// A ticket request as read from a YAML file. Everything is optional at parse
/// time; `validate` decides what is actually acceptable so that linting can
/// report every problem in one pass.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketRequest {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub issuetype: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub fix_versions: Vec<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub watchers: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project key is required (set `project` or configure a default)")]
    ProjectRequired,
    #[error("summary is required")]
    SummaryRequired,
    #[error("summary must be 255 characters or less (got {0})")]
    SummaryTooLong(usize),
    #[error("issue type is required")]
    IssueTypeRequired,
    #[error("unknown issue type `{0}` (expected one of: Bug, Task, Story, Epic, Sub-task)")]
    UnknownIssueType(String),
    #[error("unknown priority `{0}` (expected one of: Highest, High, Medium, Low, Lowest)")]
    UnknownPriority(String),
    #[error("label entries must not be empty")]
    EmptyLabel,
    #[error("label `{0}` must not contain whitespace")]
    InvalidLabel(String),
    #[error("component entries must not be empty")]
    EmptyComponent,
    #[error("fix version entries must not be empty")]
    EmptyFixVersion,
    #[error("due date `{0}` is not a valid YYYY-MM-DD date")]
    InvalidDueDate(String),
    #[error("custom field key `{0}` must look like customfield_12345")]
    InvalidCustomFieldKey(String),
    #[error("watcher entries must not be empty")]
    EmptyWatcher,
}

impl TicketRequest {
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|err| {
            AppError::Template(format!("invalid ticket file {}: {err}", path.display()))
        })
    }

    /// Checks the request against every rule and returns all violations.
    /// `fallback_project` is the key that applies when the file itself has
    /// none (a `--project` flag or the configured default).
    pub fn validate(&self, fallback_project: Option<&str>) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let project = self.project.as_deref().or(fallback_project);
        if project.map(str::trim).filter(|p| !p.is_empty()).is_none() {
            errors.push(ValidationError::ProjectRequired);
        }

        match self.summary.as_deref().map(str::trim) {
            None | Some("") => errors.push(ValidationError::SummaryRequired),
            Some(summary) => {
                let chars = summary.chars().count();
                if chars > SUMMARY_MAX_CHARS {
                    errors.push(ValidationError::SummaryTooLong(chars));
                }
            }
        }

        match self.issuetype.as_deref().map(str::trim) {
            None | Some("") => errors.push(ValidationError::IssueTypeRequired),
            Some(name) => {
                if IssueType::from_str(name).is_none() {
                    errors.push(ValidationError::UnknownIssueType(name.to_string()));
                }
            }
        }

        if let Some(name) = self.priority.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            if Priority::from_str(name).is_none() {
                errors.push(ValidationError::UnknownPriority(name.to_string()));
            }
        }

        for label in &self.labels {
            let label = label.trim();
            if label.is_empty() {
                errors.push(ValidationError::EmptyLabel);
            } else if label.chars().any(char::is_whitespace) {
                errors.push(ValidationError::InvalidLabel(label.to_string()));
            }
        }

        if self.components.iter().any(|c| c.trim().is_empty()) {
            errors.push(ValidationError::EmptyComponent);
        }
        if self.fix_versions.iter().any(|v| v.trim().is_empty()) {
            errors.push(ValidationError::EmptyFixVersion);
        }

        if let Some(due) = self.due_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            if NaiveDate::parse_from_str(due, DUE_DATE_FORMAT).is_err() {
                errors.push(ValidationError::InvalidDueDate(due.to_string()));
            }
        }

        for key in self.custom_fields.keys() {
            if !is_custom_field_key(key) {
                errors.push(ValidationError::InvalidCustomFieldKey(key.clone()));
            }
        }

        if self.watchers.iter().any(|w| w.trim().is_empty()) {
            errors.push(ValidationError::EmptyWatcher);
        }

        errors
    }
}

/// Trims entries and drops duplicates, preserving first-seen order.
pub fn dedup_trimmed(values: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !result.iter().any(|seen| seen == value) {
            result.push(value.to_string());
        }
    }
    result
}

fn is_custom_field_key(key: &str) -> bool {
    key.strip_prefix("customfield_")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// A ticket as reported back by the tracker after creation.
#[derive(Debug, Clone)]
pub struct CreatedIssue {
    pub key: String,
    pub url: Option<String>,
}
