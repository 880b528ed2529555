/// The stencil printed by `jig template`. It lints clean as-is so a user can
/// redirect it to a file and start editing.
const TICKET_TEMPLATE: &str = r##"# Ticket request template.
# Required before submission: project (or a configured default), issuetype, summary.
project: PROJ
issuetype: Task            # Bug, Task, Story, Epic, Sub-task
summary: Short, action-oriented summary
description: |
  Longer explanation of the work. Blank lines separate paragraphs.

  ```
  code, logs, or stack traces go in fenced blocks
  ```
priority: Medium           # Highest, High, Medium, Low, Lowest
# assignee: 5b109f2e9729b51b54dc274d   # account id; omit for automatic assignment
labels:
  - needs-triage
components:
  - Backend
fix_versions:
  - 1.0.0
due_date: 2026-12-31
environment: staging
# Deployment-specific fields pass through untouched.
custom_fields:
  customfield_10011: Roadmap
# Account ids added as watchers after creation.
watchers: []
"##;

pub fn run() {
    print!("{TICKET_TEMPLATE}");
}
