use std::env;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ConfigError;
use crate::llm::{ChatModel, GeminiAdapter, GeminiConfig};

const KEY_ENV: &str = "GOOGLE_API_KEY";

fn split_keys(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

/// Merges the primary value (comma-separated) with extra values, dropping
/// blanks and duplicates while keeping order.
pub fn collect_keys<I>(primary: Option<&str>, extra: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut keys: Vec<String> = Vec::new();
    let extra: Vec<String> = extra.into_iter().collect();
    let sources = primary.into_iter().chain(extra.iter().map(String::as_str));
    for key in sources.flat_map(split_keys) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Keys from the primary value followed by `GOOGLE_API_KEY_2` through
/// `GOOGLE_API_KEY_10`.
pub fn load_gemini_keys(primary: Option<&str>) -> Vec<String> {
    let numbered = (2..=10).filter_map(|idx| env::var(format!("{}_{}", KEY_ENV, idx)).ok());
    collect_keys(primary, numbered)
}

pub fn gemini_config(cfg: &ServerConfig, api_keys: Vec<String>) -> Result<GeminiConfig, ConfigError> {
    if api_keys.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(GeminiConfig {
        api_keys,
        base_url: cfg.base_url.clone(),
        model: cfg.model.clone(),
        temperature: cfg.temperature,
        max_output_tokens: cfg.max_output_tokens,
        timeout: cfg.request_timeout(),
    })
}

pub fn build_chat_model(cfg: &ServerConfig) -> Result<ChatModel, ConfigError> {
    let keys = load_gemini_keys(cfg.api_key.as_deref());
    let adapter = GeminiAdapter::new(gemini_config(cfg, keys)?)?;
    tracing::info!(model = adapter.model(), "gemini model configured");
    Ok(Arc::new(adapter))
}
