//! On-disk shape of `config.toml`.
//!
//! Every field is optional so a partial file can be completed from the
//! environment and defaults.

use duet_core::config::{ExecutionMode, ReasoningSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFileDTO {
    #[serde(default)]
    pub agent: AgentSectionDTO,
    #[serde(default)]
    pub completion: CompletionSectionDTO,
    #[serde(default)]
    pub polling: PollingSectionDTO,
    #[serde(default)]
    pub execution: Option<ExecutionMode>,
    #[serde(default)]
    pub demo_queries: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSectionDTO {
    pub base_url: Option<String>,
    pub agent_id: Option<String>,
    pub agent_id_file: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionSectionDTO {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub http_referer: Option<String>,
    pub x_title: Option<String>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollingSectionDTO {
    pub poll_interval_ms: Option<u64>,
    pub max_wait_secs: Option<u64>,
    pub reasoning_source: Option<ReasoningSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_parses() {
        let dto: ConfigFileDTO = toml::from_str(
            r#"
            execution = "sequential"

            [agent]
            base_url = "http://localhost:8800"

            [polling]
            max_wait_secs = 30
            reasoning_source = "reuse_observed"
            "#,
        )
        .unwrap();

        assert_eq!(dto.agent.base_url.as_deref(), Some("http://localhost:8800"));
        assert_eq!(dto.polling.max_wait_secs, Some(30));
        assert_eq!(dto.polling.reasoning_source, Some(ReasoningSource::ReuseObserved));
        assert_eq!(dto.execution, Some(ExecutionMode::Sequential));
        assert!(dto.completion.api_key.is_none());
    }

    #[test]
    fn test_empty_file_parses_to_default() {
        let dto: ConfigFileDTO = toml::from_str("").unwrap();
        assert_eq!(dto, ConfigFileDTO::default());
    }
}
