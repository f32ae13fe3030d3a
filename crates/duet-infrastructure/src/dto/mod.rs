pub mod config_file;

pub use config_file::{AgentSectionDTO, CompletionSectionDTO, ConfigFileDTO, PollingSectionDTO};
