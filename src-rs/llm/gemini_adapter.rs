use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::rotation::Rotator;
use super::types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, ToolCall};
use crate::tools::ToolSchema;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct GeminiAdapter {
    cfg: GeminiConfig,
    rotator: Rotator,
    client: Client,
}

impl GeminiAdapter {
    pub fn new(mut cfg: GeminiConfig) -> Result<Self, ProviderError> {
        if cfg.base_url.is_empty() {
            cfg.base_url = DEFAULT_BASE_URL.to_string();
        }
        cfg.model = normalize_model(&cfg.model);
        if cfg.model.is_empty() {
            cfg.model = DEFAULT_MODEL.to_string();
        }
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|err| ProviderError::new("client_error", &err.to_string(), false))?;
        Ok(Self {
            rotator: Rotator::new(cfg.api_keys.clone()),
            cfg,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let payload = build_payload(
            &request.messages,
            request.tools.as_ref(),
            self.cfg.temperature,
            self.cfg.max_output_tokens,
        );

        let tries = self.rotator.len();
        if tries == 0 {
            return Err(ProviderError::new("auth_error", "no Gemini API keys", false));
        }
        let mut last_err = None;
        for attempt in 0..tries {
            let key = match self.rotator.next() {
                Some(key) => key,
                None => break,
            };
            match send_request(&self.client, &self.cfg.base_url, &self.cfg.model, &key, &payload) {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    warn!(attempt, code = %err.code, "gemini request failed");
                    let retryable = err.retryable;
                    last_err = Some(err);
                    if !retryable {
                        break;
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| ProviderError::new("api_error", "request failed", true)))
    }
}

/// Accepts both `gemini-2.5-flash` and `models/gemini-2.5-flash`.
fn normalize_model(model: &str) -> String {
    model.trim().trim_start_matches("models/").to_string()
}

fn build_payload(
    messages: &[Message],
    tools: Option<&Vec<ToolSchema>>,
    temperature: f64,
    max_output_tokens: u32,
) -> Value {
    let mut contents: Vec<Value> = Vec::new();
    let mut system_instruction = None;

    for msg in messages {
        match msg.role.as_str() {
            "system" => {
                system_instruction = Some(msg.content.clone());
            }
            "assistant" => {
                let mut parts = Vec::new();
                if !msg.content.is_empty() {
                    parts.push(json!({"text": msg.content}));
                }
                for call in &msg.tool_calls {
                    parts.push(json!({
                        "functionCall": {"name": call.name, "args": call.args}
                    }));
                }
                if parts.is_empty() {
                    continue;
                }
                contents.push(json!({"role": "model", "parts": parts}));
            }
            "tool" => {
                let part = json!({
                    "functionResponse": {
                        "name": msg.tool_name.clone().unwrap_or_default(),
                        "response": {"content": msg.content}
                    }
                });
                // Responses to one model turn travel together in a single content.
                let merged = contents.last_mut().and_then(|last| {
                    let is_response = last["parts"]
                        .as_array()
                        .map(|parts| parts.iter().all(|p| p.get("functionResponse").is_some()))
                        .unwrap_or(false);
                    if is_response {
                        last["parts"].as_array_mut()
                    } else {
                        None
                    }
                });
                match merged {
                    Some(parts) => parts.push(part),
                    None => contents.push(json!({"role": "user", "parts": [part]})),
                }
            }
            _ => {
                contents.push(json!({
                    "role": "user",
                    "parts": [{"text": msg.content}]
                }));
            }
        }
    }

    let mut payload = json!({
        "contents": contents,
        "generationConfig": {
            "temperature": temperature,
            "maxOutputTokens": max_output_tokens
        }
    });

    if let Some(system) = system_instruction {
        payload["systemInstruction"] = json!({
            "parts": [{"text": system}]
        });
    }

    if let Some(tools) = tools.filter(|tools| !tools.is_empty()) {
        let declarations: Vec<Value> = tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters.clone().unwrap_or(json!({})),
                })
            })
            .collect();
        payload["tools"] = json!([
            {
                "functionDeclarations": declarations
            }
        ]);
    }

    payload
}

fn send_request(
    client: &Client,
    base_url: &str,
    model: &str,
    api_key: &str,
    payload: &Value,
) -> Result<LLMResponse, ProviderError> {
    let endpoint = format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    );
    debug!(%endpoint, "sending gemini request");
    let resp = client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(payload)
        .send()
        .map_err(|err| ProviderError::new("network_error", &err.to_string(), true))?;

    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    if status.is_client_error() || status.is_server_error() {
        return Err(classify_failure(status.as_u16(), &body));
    }

    let raw: Value = serde_json::from_str(&body)
        .map_err(|_| ProviderError::new("parse_error", "invalid json", false))?;
    let (content, tool_calls) = parse_response(&raw);
    Ok(LLMResponse { content, tool_calls })
}

fn classify_failure(status: u16, body: &str) -> ProviderError {
    let lowered = body.to_lowercase();
    if status == 401 || status == 403 {
        return ProviderError::new("auth_error", body, true);
    }
    if status == 429 || lowered.contains("quota") || lowered.contains("resource_exhausted") {
        return ProviderError::new("rate_limit", body, true);
    }
    if status >= 500 {
        return ProviderError::new("server_error", body, true);
    }
    ProviderError::new("api_error", body, false)
}

fn parse_response(raw: &Value) -> (String, Vec<ToolCall>) {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    let parts = match raw
        .pointer("/candidates/0/content/parts")
        .and_then(|v| v.as_array())
    {
        Some(parts) => parts,
        None => return (text, tool_calls),
    };

    for part in parts {
        if let Some(chunk) = part.get("text").and_then(|v| v.as_str()) {
            text.push_str(chunk);
        }
        if let Some(fc) = part.get("functionCall") {
            let name = fc.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let args = fc.get("args").cloned().unwrap_or(json!({}));
            tool_calls.push(ToolCall {
                name: name.to_string(),
                args,
            });
        }
    }

    (text, tool_calls)
}
