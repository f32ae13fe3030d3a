pub mod openrouter_api_agent;
pub mod parlant_api_client;
pub mod prompts;

pub use openrouter_api_agent::OpenRouterApiAgent;
pub use parlant_api_client::{ParlantApiClient, ParlantConnector};
pub use prompts::TRADITIONAL_SYSTEM_PROMPT;
