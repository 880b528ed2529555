use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const CONFIG_FILE_NAME: &str = ".jira-cli-config.yaml";
pub const DEFAULT_MAX_RESULTS: u32 = 50;

pub fn default_config_path() -> AppResult<PathBuf> {
    let home = env::var_os("HOME")
        .ok_or_else(|| AppError::Configuration("HOME is not set".to_string()))?;
    Ok(PathBuf::from(home).join(CONFIG_FILE_NAME))
}

/// On-disk configuration, stored as YAML. Every key is optional so a partial
/// file (or no file at all) still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl StoredConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_yaml::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!(
                    "invalid config file {}: {err}",
                    path.display()
                ))
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_yaml::to_string(self).map_err(|err| {
            AppError::Configuration(format!("failed to encode config: {err}"))
        })?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// Resolved runtime configuration: stored file plus environment overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub default_project: Option<String>,
    pub default_assignee: Option<String>,
    pub max_results: u32,
}

impl AppConfig {
    pub fn resolve(stored: StoredConfig) -> Self {
        Self {
            server: env_override("JIRA_SERVER", stored.server),
            email: env_override("JIRA_EMAIL", stored.email),
            api_token: env_override("JIRA_API_TOKEN", stored.api_token),
            default_project: stored.default_project,
            default_assignee: stored.default_assignee,
            max_results: stored.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        }
    }
}

fn env_override(var: &str, stored: Option<String>) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty()).or(stored)
}
