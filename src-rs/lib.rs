pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod result;
pub mod selector;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "tools/lib.rs"]
pub mod tools;
#[path = "api/lib.rs"]
pub mod api;

pub use agent::Agent;
pub use chat::ChatService;
pub use config::{AgentConfig, ServerConfig};
pub use error::{AgentError, ChatError, ConfigError};
pub use result::{AgentRun, ChatReply, IntermediateStep, ModelReply, StopReason};
pub use selector::select;
