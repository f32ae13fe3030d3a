pub mod agent_id_source;
pub mod config_service;
pub mod dto;
pub mod paths;
pub mod storage;

pub use crate::agent_id_source::{
    FileAgentIdSource, StaticAgentIdSource, agent_id_source_from_config,
};
pub use crate::config_service::ConfigService;
