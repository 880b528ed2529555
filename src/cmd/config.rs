use std::io::{self, Write};
use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::{DEFAULT_MAX_RESULTS, StoredConfig};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(config_path: &Path, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(config_path),
        ConfigCommand::Show => run_show(config_path),
    }
}

fn run_init(config_path: &Path) -> AppResult<()> {
    let mut cfg = StoredConfig::load(config_path)?;

    println!("Configuring jig.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "Jira server URL (e.g., https://company.atlassian.net)",
        &mut cfg.server,
        false,
    )?;
    apply_prompt("Jira email", &mut cfg.email, false)?;
    apply_prompt("Jira API token", &mut cfg.api_token, true)?;
    apply_prompt("Default project key", &mut cfg.default_project, false)?;
    apply_prompt(
        "Default assignee account id",
        &mut cfg.default_assignee,
        false,
    )?;
    apply_numeric_prompt("Maximum issues listed", &mut cfg.max_results)?;

    cfg.save(config_path)?;

    println!("\nConfiguration saved to {}", config_path.display());
    Ok(())
}

fn run_show(config_path: &Path) -> AppResult<()> {
    let cfg = StoredConfig::load(config_path)?;

    println!("Configuration file: {}", config_path.display());
    println!("Jira server URL: {}", display_value(&cfg.server));
    println!("Jira email: {}", display_value(&cfg.email));
    println!("Jira API token: {}", mask_secret(&cfg.api_token));
    println!("Default project: {}", display_value(&cfg.default_project));
    println!("Default assignee: {}", display_value(&cfg.default_assignee));
    println!(
        "Maximum issues listed: {}",
        cfg.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    );

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_numeric_prompt(field: &str, target: &mut Option<u32>) -> AppResult<()> {
    let current = target.map(|value| value.to_string());
    match prompt(field, current.as_deref(), false)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => match value.parse() {
            Ok(parsed) => *target = Some(parsed),
            Err(_) => println!("Not a number; keeping the previous value."),
        },
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.len() > 6 => {
            let prefix = &token[..3];
            let suffix = &token[token.len() - 3..];
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
