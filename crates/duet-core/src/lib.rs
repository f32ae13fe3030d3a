pub mod comparison;
pub mod completion;
pub mod config;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::{Backend, DuetError};

pub use comparison::{ComparisonResult, NO_REPLY_SENTINEL};
pub use completion::CompletionPort;
