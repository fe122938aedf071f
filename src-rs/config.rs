use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::llm::gemini_adapter::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Agent loop settings.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub system_prompt: String,
    pub max_iterations: usize,
    pub general_query_tool: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_iterations: 2,
            general_query_tool: false,
        }
    }
}

/// Process configuration, read from flags, the environment and `.env`.
#[derive(Clone, Debug, Parser)]
#[command(name = "menu-agent", version, about = "Chat endpoint backed by a tool-calling Gemini agent")]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Gemini API key; a comma-separated list rotates between keys.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "GEMINI_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f64,

    #[arg(long, env = "GEMINI_MAX_OUTPUT_TOKENS", default_value_t = 2048)]
    pub max_output_tokens: u32,

    #[arg(long, env = "GEMINI_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "AGENT_MAX_ITERATIONS", default_value_t = 2)]
    pub max_iterations: usize,

    #[arg(long, env = "AGENT_SYSTEM_PROMPT", default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system_prompt: String,

    /// Offer the generalQuery tool to the agent as well as getMenu.
    #[arg(long, env = "AGENT_GENERAL_QUERY_TOOL")]
    pub general_query_tool: bool,

    /// Directory holding the landing page (`index.html`).
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// json, pretty or compact.
    #[arg(long, env = "LOG_FORMAT", default_value = "compact")]
    pub log_format: String,
}

impl ServerConfig {
    pub fn agent_config(&self) -> AgentConfig {
        let defaults = AgentConfig::default();
        AgentConfig {
            system_prompt: if self.system_prompt.trim().is_empty() {
                defaults.system_prompt
            } else {
                self.system_prompt.clone()
            },
            max_iterations: if self.max_iterations == 0 {
                defaults.max_iterations
            } else {
                self.max_iterations
            },
            general_query_tool: self.general_query_tool,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
