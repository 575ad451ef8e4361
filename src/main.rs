mod cache;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod summarize;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::message::{self, MessageCommandArgs};
use crate::config::{AppConfig, ConfigOverrides};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::auth::AzureAuthFlow;
use crate::infra::azure::AzureOpenAiClient;
use crate::infra::git::GitCli;
use crate::infra::style::FileStyleGuide;
use crate::services::CredentialProvider;

#[derive(Parser)]
#[command(
    name = "scribe",
    author,
    version,
    about = "Generate a commit message from local changes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize local changes into a commit message.
    Message(MessageArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct MessageArgs {
    /// Summarize only staged files.
    #[arg(short, long)]
    staged: bool,
    /// Override the configured model deployment.
    #[arg(short, long)]
    model: Option<String>,
    /// Override the per-request token budget.
    #[arg(short, long)]
    budget: Option<usize>,
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

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(())
        }
        Commands::Message(args) => run_message(args).await,
    }
}

async fn run_message(args: MessageArgs) -> AppResult<()> {
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(
        &cwd,
        ConfigOverrides {
            model: args.model,
            budget: args.budget,
        },
    )?;

    if config.endpoint.is_none() {
        eprintln!("Warning: backend endpoint not configured; generation will fail.");
    }
    if config.tenant_id.is_none() || config.client_id.is_none() || config.scope.is_none() {
        eprintln!("Warning: Azure AD login not fully configured; authentication will fail.");
    }

    let credentials: Arc<dyn CredentialProvider> = Arc::new(AzureAuthFlow::new(
        config.tenant_id.clone(),
        config.client_id.clone(),
        config.scope.clone(),
    ));
    let generator = Arc::new(AzureOpenAiClient::new(
        config.endpoint.clone(),
        config.deployment.clone(),
        config.api_version.clone(),
        credentials,
    ));
    let version_control = Arc::new(GitCli::new(config.workspace_root.clone()));
    let style_guide = Arc::new(FileStyleGuide::new(config.workspace_root.clone()));

    let context = AppContext::new(config, version_control, generator, style_guide);

    let message = message::run(&context, MessageCommandArgs { staged: args.staged }).await?;

    println!("{}", message.as_str());

    Ok(())
}
