#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use menu_agent_rs::llm::{CompletionRequest, LLMResponse, ProviderAdapter, ProviderError, ToolCall};
use serde_json::Value;

/// Replays canned model responses in order and records every request.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<LLMResponse, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<LLMResponse, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ProviderAdapter for ScriptedModel {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::new("script_exhausted", "no scripted reply left", false)))
    }
}

pub fn text(content: &str) -> Result<LLMResponse, ProviderError> {
    Ok(LLMResponse {
        content: content.to_string(),
        tool_calls: Vec::new(),
    })
}

pub fn tool_call(name: &str, args: Value) -> Result<LLMResponse, ProviderError> {
    Ok(LLMResponse {
        content: String::new(),
        tool_calls: vec![ToolCall {
            name: name.to_string(),
            args,
        }],
    })
}

pub fn failure(code: &str, message: &str) -> Result<LLMResponse, ProviderError> {
    Err(ProviderError::new(code, message, true))
}
