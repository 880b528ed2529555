use std::path::PathBuf;

use clap::Args;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::workflow::submit::{SubmitOutcome, submit_ticket};

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Path to the ticket request YAML file.
    pub file: PathBuf,
    /// Override the project key from the file or config.
    #[arg(short, long)]
    pub project: Option<String>,
    /// Validate and print the JSON payload without submitting.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(ctx: &AppContext, args: CreateArgs) -> AppResult<()> {
    match submit_ticket(ctx, &args.file, args.project, args.dry_run).await? {
        SubmitOutcome::DryRun { payload } => {
            let pretty = serde_json::to_string_pretty(&payload)
                .map_err(|err| AppError::Template(format!("failed to encode payload: {err}")))?;
            println!("{pretty}");
        }
        SubmitOutcome::Created {
            issue,
            watchers_added,
        } => {
            println!("Created issue {}.", issue.key);
            if let Some(url) = &issue.url {
                println!("View ticket: {url}");
            }
            if watchers_added > 0 {
                println!("Added {watchers_added} watcher(s).");
            }
        }
    }
    Ok(())
}
