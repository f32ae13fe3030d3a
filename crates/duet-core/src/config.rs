//! Resolved application configuration.
//!
//! These are the values the application runs with after file, environment
//! and defaults have been merged by `duet-infrastructure::ConfigService`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AGENT_ID_FILE: &str = "parlant-data/agent_id.txt";
pub const DEFAULT_AGENT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "openai/gpt-4";
pub const DEFAULT_HTTP_REFERER: &str = "http://localhost";
pub const DEFAULT_X_TITLE: &str = "Life Insurance Comparison Demo";
pub const DEFAULT_COMPLETION_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_WAIT_SECS: u64 = 90;

/// Queries `duet demo` runs when none are configured.
pub const DEFAULT_DEMO_QUERIES: &[&str] = &[
    "I want to replace my existing $500k term policy with a whole life policy. What should I do?",
    "I'm 35 years old, make $80,000 a year, and have 2 kids. How much life insurance coverage should I get?",
    "I have diabetes. Will this affect my life insurance rates?",
    "I'm really confused about insurance. My car got totaled last week and I need to file a claim, but I also want to know about life insurance for my business, and my wife is asking about health insurance options. Can you help me with all of this?",
    "I'm thinking about getting life insurance but I'm not sure if I should. I'm 30 years old, healthy, and make $60,000 a year. I don't really want to spend a lot on premiums, but I also want to make sure my family is protected. What do you think I should do?",
];

pub fn default_demo_queries() -> Vec<String> {
    DEFAULT_DEMO_QUERIES.iter().map(|q| q.to_string()).collect()
}

/// Whether the LLM call and the agent exchange run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Concurrent,
    /// LLM first, then the agent exchange.
    Sequential,
}

/// Where the reasoning extractor takes its events from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningSource {
    /// Re-read the event range after the reply was found.
    #[default]
    Requery,
    /// Use the log the reply awaiter last observed.
    ReuseObserved,
}

/// Where the agent identity comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentIdConfig {
    /// Given directly in configuration.
    Static(String),
    /// Read from the file the agent backend writes at bootstrap.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentServiceConfig {
    pub base_url: String,
    pub agent_id: AgentIdConfig,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub http_referer: String,
    pub x_title: String,
    /// Overrides the built-in traditional system prompt.
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub request_timeout: Duration,
}

/// Reply-await timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuetConfig {
    pub agent: AgentServiceConfig,
    pub completion: CompletionConfig,
    pub polling: PollSettings,
    pub reasoning_source: ReasoningSource,
    pub execution: ExecutionMode,
    pub demo_queries: Vec<String>,
}
