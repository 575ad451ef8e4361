use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
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
    /// Show the stored configuration.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring scribe.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        "Azure OpenAI endpoint (e.g., https://company.openai.azure.com)",
        &mut cfg.endpoint,
    )?;
    apply_prompt("Deployment name", &mut cfg.deployment)?;
    apply_prompt("API version", &mut cfg.api_version)?;
    apply_prompt("Azure AD tenant ID", &mut cfg.tenant_id)?;
    apply_prompt("Azure AD client ID", &mut cfg.client_id)?;
    apply_prompt("OAuth scope (e.g., api://your-app/.default)", &mut cfg.scope)?;
    apply_budget_prompt("Token budget per request", &mut cfg.token_budget)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Endpoint: {}", display_value(&cfg.endpoint));
    println!("Deployment: {}", display_value(&cfg.deployment));
    println!("API version: {}", display_value(&cfg.api_version));
    println!("Tenant ID: {}", display_value(&cfg.tenant_id));
    println!("Client ID: {}", display_value(&cfg.client_id));
    println!("OAuth scope: {}", display_value(&cfg.scope));
    println!(
        "Token budget: {}",
        cfg.token_budget
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<not set>".to_string())
    );

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>) -> AppResult<()> {
    match prompt(field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_budget_prompt(field: &str, target: &mut Option<usize>) -> AppResult<()> {
    let current = target.map(|v| v.to_string());
    match prompt(field, current.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => match value.parse::<usize>() {
            Ok(parsed) if parsed > 0 => *target = Some(parsed),
            _ => println!("Not a positive integer, keeping the previous value."),
        },
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match current {
        Some(value) => write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(stdout, "{field} (Enter to skip): ")?,
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

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
