//! Configuration service implementation.
//!
//! Loads [`DuetConfig`] from `config.toml` and the environment.
//!
//! Priority per key:
//! 1. config.toml
//! 2. Environment variables
//! 3. Built-in defaults

use crate::dto::ConfigFileDTO;
use crate::paths::DuetPaths;
use crate::storage::ConfigStorage;
use duet_core::DuetError;
use duet_core::config::{
    AgentIdConfig, AgentServiceConfig, CompletionConfig, DEFAULT_AGENT_ID_FILE,
    DEFAULT_AGENT_REQUEST_TIMEOUT_SECS, DEFAULT_COMPLETION_BASE_URL, DEFAULT_COMPLETION_MODEL,
    DEFAULT_COMPLETION_REQUEST_TIMEOUT_SECS, DEFAULT_HTTP_REFERER, DEFAULT_MAX_WAIT_SECS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_X_TITLE,
    DuetConfig, PollSettings, default_demo_queries,
};
use duet_core::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PARLANT_BASE_URL: &str = "PARLANT_BASE_URL";
pub const ENV_PARLANT_AGENT_ID: &str = "PARLANT_AGENT_ID";
pub const ENV_PARLANT_AGENT_ID_FILE: &str = "PARLANT_AGENT_ID_FILE";
pub const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_OPENROUTER_BASE_URL: &str = "OPENROUTER_BASE_URL";
pub const ENV_OPENROUTER_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_OPENROUTER_HTTP_REFERER: &str = "OPENROUTER_HTTP_REFERER";
pub const ENV_OPENROUTER_X_TITLE: &str = "OPENROUTER_X_TITLE";
pub const ENV_POLL_INTERVAL_MS: &str = "DUET_POLL_INTERVAL_MS";
pub const ENV_MAX_WAIT_SECS: &str = "DUET_MAX_WAIT_SECS";
pub const ENV_DEMO_QUERIES: &str = "DEMO_QUERIES";

/// Loads the application configuration from a config file and the process environment.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `path` if given, otherwise `~/.config/duet/config.toml`.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => DuetPaths::config_file().map_err(|e| DuetError::config(e.to_string()))?,
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<DuetConfig> {
        let file = ConfigStorage::with_path(&self.path).load()?.unwrap_or_default();
        resolve_config(file, |key| std::env::var(key).ok())
    }
}

/// Merges a parsed config file with an environment lookup.
pub fn resolve_config<F>(file: ConfigFileDTO, env: F) -> Result<DuetConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let base_url = file
        .agent
        .base_url
        .or_else(|| env(ENV_PARLANT_BASE_URL))
        .ok_or_else(|| {
            DuetError::config(format!(
                "{ENV_PARLANT_BASE_URL} not found in config.toml [agent].base_url or environment variables"
            ))
        })?;

    let agent_id = match file.agent.agent_id.or_else(|| env(ENV_PARLANT_AGENT_ID)) {
        Some(id) => AgentIdConfig::Static(id),
        None => AgentIdConfig::File(
            file.agent
                .agent_id_file
                .or_else(|| env(ENV_PARLANT_AGENT_ID_FILE).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AGENT_ID_FILE)),
        ),
    };

    let request_timeout = Duration::from_secs(
        file.agent
            .request_timeout_secs
            .unwrap_or(DEFAULT_AGENT_REQUEST_TIMEOUT_SECS),
    );

    let api_key = file
        .completion
        .api_key
        .or_else(|| env(ENV_OPENROUTER_API_KEY))
        .ok_or_else(|| {
            DuetError::config(format!(
                "{ENV_OPENROUTER_API_KEY} not found in config.toml [completion].api_key or environment variables"
            ))
        })?;

    let completion = CompletionConfig {
        api_key,
        base_url: trim_base_url(
            file.completion
                .base_url
                .or_else(|| env(ENV_OPENROUTER_BASE_URL))
                .unwrap_or_else(|| DEFAULT_COMPLETION_BASE_URL.to_string()),
        ),
        model: file
            .completion
            .model
            .or_else(|| env(ENV_OPENROUTER_MODEL))
            .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
        http_referer: file
            .completion
            .http_referer
            .or_else(|| env(ENV_OPENROUTER_HTTP_REFERER))
            .unwrap_or_else(|| DEFAULT_HTTP_REFERER.to_string()),
        x_title: file
            .completion
            .x_title
            .or_else(|| env(ENV_OPENROUTER_X_TITLE))
            .unwrap_or_else(|| DEFAULT_X_TITLE.to_string()),
        system_prompt: file.completion.system_prompt,
        max_tokens: file.completion.max_tokens,
        request_timeout: Duration::from_secs(
            file.completion
                .request_timeout_secs
                .unwrap_or(DEFAULT_COMPLETION_REQUEST_TIMEOUT_SECS),
        ),
    };

    let poll_interval_ms = match file.polling.poll_interval_ms {
        Some(ms) => ms,
        None => parse_env_u64(&env, ENV_POLL_INTERVAL_MS)?.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
    };
    if poll_interval_ms == 0 {
        return Err(DuetError::config("poll interval must be at least 1 ms"));
    }
    let max_wait_secs = match file.polling.max_wait_secs {
        Some(secs) => secs,
        None => parse_env_u64(&env, ENV_MAX_WAIT_SECS)?.unwrap_or(DEFAULT_MAX_WAIT_SECS),
    };

    let demo_queries = match file.demo_queries {
        Some(queries) => queries,
        None => env(ENV_DEMO_QUERIES)
            .map(|raw| parse_demo_queries(&raw))
            .unwrap_or_else(default_demo_queries),
    };

    Ok(DuetConfig {
        agent: AgentServiceConfig {
            base_url: trim_base_url(base_url),
            agent_id,
            request_timeout,
        },
        completion,
        polling: PollSettings {
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_wait: Duration::from_secs(max_wait_secs),
        },
        reasoning_source: file.polling.reasoning_source.unwrap_or_default(),
        execution: file.execution.unwrap_or_default(),
        demo_queries,
    })
}

fn parse_env_u64<F>(env: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                DuetError::config(format!("{key} must be a non-negative integer, got '{raw}'"))
            })
        })
        .transpose()
}

/// Invalid JSON falls back to the built-in queries rather than failing startup.
fn parse_demo_queries(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(queries) => queries,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "{ENV_DEMO_QUERIES} is not a JSON string array; using built-in demo queries"
            );
            default_demo_queries()
        }
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
