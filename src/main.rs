use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use jig::cmd::config::{self as config_cmd, ConfigArgs};
use jig::cmd::create::{self, CreateArgs};
use jig::cmd::lint::{self, LintArgs};
use jig::cmd::list::{self, ListArgs};
use jig::cmd::template;
use jig::cmd::view::{self, ViewArgs};
use jig::config::{self, AppConfig, StoredConfig};
use jig::context::AppContext;
use jig::error::AppResult;
use jig::infra::jira::JiraClient;

#[derive(Parser)]
#[command(name = "jig", author, version, about = "Jira ticket CLI")]
struct Cli {
    /// Path to the config file (defaults to ~/.jira-cli-config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a starter ticket request template.
    Template,
    /// Validate a ticket request file and report every problem.
    Lint(LintArgs),
    /// Create an issue from a ticket request file.
    Create(CreateArgs),
    /// List issues matching JQL filters.
    List(ListArgs),
    /// Show one issue as markdown.
    View(ViewArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("jig=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };

    match cli.command {
        Commands::Template => {
            template::run();
            Ok(())
        }
        Commands::Config(args) => config_cmd::run(&config_path, args.command),
        Commands::Lint(args) => {
            let config = load_config(&config_path)?;
            lint::run(&config, args)
        }
        Commands::Create(args) => {
            let ctx = build_context(&config_path)?;
            create::run(&ctx, args).await
        }
        Commands::List(args) => {
            let ctx = build_context(&config_path)?;
            list::run(&ctx, args).await
        }
        Commands::View(args) => {
            let ctx = build_context(&config_path)?;
            view::run(&ctx, args).await
        }
    }
}

fn load_config(config_path: &Path) -> AppResult<AppConfig> {
    Ok(AppConfig::resolve(StoredConfig::load(config_path)?))
}

fn build_context(config_path: &Path) -> AppResult<AppContext> {
    let config = load_config(config_path)?;
    let issue_tracker = Arc::new(JiraClient::new(
        config.server.clone(),
        config.email.clone(),
        config.api_token.clone(),
    ));
    Ok(AppContext::new(config, issue_tracker))
}
