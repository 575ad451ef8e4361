use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::chunk::TokenBudget;
use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_DEPLOYMENT: &str = "gpt-4-turbo";
const DEFAULT_API_VERSION: &str = "2024-06-01";
const DEFAULT_TOKEN_BUDGET: usize = 3000;

pub fn config_directory() -> AppResult<PathBuf> {
    if let Ok(dir) = env::var("SCRIBE_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME")
        .map_err(|_| AppError::Configuration("HOME is not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join("scribe"))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// What the `config init` wizard persists to disk. Every field is optional;
/// resolution decides what is actually required for a given run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
    pub api_version: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub scope: Option<String>,
    pub token_budget: Option<usize>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

/// Per-run overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub budget: Option<usize>,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub deployment: String,
    pub api_version: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub scope: Option<String>,
    pub token_budget: TokenBudget,
    pub workspace_root: PathBuf,
}

impl AppConfig {
    pub fn load(workspace_root: &Path, overrides: ConfigOverrides) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(workspace_root, stored, |key| env::var(key).ok(), overrides)
    }

    /// Precedence per field: CLI override, then `SCRIBE_*` environment
    /// variable, then stored config, then built-in default. The env lookup
    /// is injected so resolution stays testable without touching process
    /// state.
    pub fn resolve(
        workspace_root: &Path,
        stored: StoredConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> AppResult<Self> {
        let endpoint = env_lookup("SCRIBE_ENDPOINT").or(stored.endpoint);
        let deployment = overrides
            .model
            .or_else(|| env_lookup("SCRIBE_DEPLOYMENT"))
            .or(stored.deployment)
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string());
        let api_version = env_lookup("SCRIBE_API_VERSION")
            .or(stored.api_version)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let tenant_id = env_lookup("SCRIBE_TENANT_ID").or(stored.tenant_id);
        let client_id = env_lookup("SCRIBE_CLIENT_ID").or(stored.client_id);
        let scope = env_lookup("SCRIBE_SCOPE").or(stored.scope);

        let budget_value = match overrides.budget {
            Some(value) => value,
            None => match env_lookup("SCRIBE_TOKEN_BUDGET") {
                Some(raw) => raw.parse::<usize>().map_err(|_| {
                    AppError::Configuration(format!(
                        "SCRIBE_TOKEN_BUDGET must be a positive integer, got '{raw}'"
                    ))
                })?,
                None => stored.token_budget.unwrap_or(DEFAULT_TOKEN_BUDGET),
            },
        };
        let token_budget = TokenBudget::new(budget_value)?;

        Ok(Self {
            endpoint,
            deployment,
            api_version,
            tenant_id,
            client_id,
            scope,
            token_budget,
            workspace_root: workspace_root.to_path_buf(),
        })
    }
}
