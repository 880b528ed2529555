use std::path::PathBuf;

use clap::Args;

use crate::config::AppConfig;
use crate::domain::ticket::TicketRequest;
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct LintArgs {
    /// Path to the ticket request YAML file.
    pub file: PathBuf,
    /// Project key to assume when the file has none.
    #[arg(short, long)]
    pub project: Option<String>,
}

pub fn run(config: &AppConfig, args: LintArgs) -> AppResult<()> {
    let request = TicketRequest::from_yaml_file(&args.file)?;

    let fallback = args
        .project
        .as_deref()
        .or(config.default_project.as_deref());
    let errors = request.validate(fallback);

    if errors.is_empty() {
        println!("{}: ok", args.file.display());
        return Ok(());
    }

    for error in &errors {
        println!("{}: {error}", args.file.display());
    }
    Err(AppError::Template(format!(
        "{} validation error(s)",
        errors.len()
    )))
}
