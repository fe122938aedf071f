use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no Gemini API key configured (set GOOGLE_API_KEY)")]
    MissingApiKey,
    #[error("failed to build model client: {0}")]
    Client(#[from] ProviderError),
    #[error("tool setup failed: {0}")]
    Tool(#[from] crate::tools::ToolError),
}

/// Failure of an agent run itself, as opposed to a run with no usable answer.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("agent run failed: {0}")]
    Agent(#[from] AgentError),
    #[error("direct model call failed: {0}")]
    Model(#[from] ProviderError),
    #[error("request worker failed: {0}")]
    Worker(String),
}
