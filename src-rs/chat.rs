use tracing::{debug, info};

use crate::agent::Agent;
use crate::config::{AgentConfig, ServerConfig};
use crate::error::{ChatError, ConfigError};
use crate::helpers::build_chat_model;
use crate::llm::ChatModel;
use crate::result::{ChatReply, ModelReply};
use crate::selector::select;
use crate::tools::{GeneralQueryTool, MenuTool, Tool, ToolRegistry};

/// Everything one chat request needs. Built once at startup and shared
/// read-only between requests.
pub struct ChatService {
    agent: Agent,
    model: ChatModel,
}

impl ChatService {
    pub fn new(config: AgentConfig, model: ChatModel) -> Result<Self, ConfigError> {
        let mut tools = ToolRegistry::new();
        tools.register(Tool::Menu(MenuTool::default()))?;
        if config.general_query_tool {
            tools.register(Tool::GeneralQuery(GeneralQueryTool::new(model.clone())))?;
        }
        let agent = Agent::new(config, model.clone(), tools);
        Ok(Self { agent, model })
    }

    pub fn from_config(cfg: &ServerConfig) -> Result<Self, ConfigError> {
        let model = build_chat_model(cfg)?;
        Self::new(cfg.agent_config(), model)
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Runs the agent on `input` and picks the reply. Blocks on model calls.
    pub fn respond(&self, input: &str) -> Result<ChatReply, ChatError> {
        let run = self.agent.run(input)?;
        debug!(
            run = %serde_json::to_string(&run).unwrap_or_default(),
            "agent run finished"
        );
        select(run, || self.ask_model(input))
    }

    pub fn ask_model(&self, input: &str) -> Result<ModelReply, ChatError> {
        let reply = self.model.ask(input)?;
        info!(chars = reply.text.len(), "direct model reply");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::llm::{CompletionRequest, LLMResponse, ProviderAdapter, ProviderError};
    use crate::tools::{GENERAL_QUERY_TOOL_NAME, MENU_TOOL_NAME};

    /// Answers agent turns (with tools attached) with `agent_text` and
    /// direct calls with `direct_text`.
    struct SplitModel {
        agent_text: String,
        direct_text: String,
        direct_calls: AtomicUsize,
    }

    impl ProviderAdapter for SplitModel {
        fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
            let content = if request.messages.len() == 1 {
                self.direct_calls.fetch_add(1, Ordering::SeqCst);
                self.direct_text.clone()
            } else {
                self.agent_text.clone()
            };
            Ok(LLMResponse {
                content,
                tool_calls: Vec::new(),
            })
        }
    }

    #[test]
    fn answer_without_tool_goes_to_model_once() {
        let model = Arc::new(SplitModel {
            agent_text: "agent says hi".to_string(),
            direct_text: "Hi there!".to_string(),
            direct_calls: AtomicUsize::new(0),
        });
        let service = ChatService::new(AgentConfig::default(), model.clone()).unwrap();

        let reply = service.respond("Hello!").unwrap();
        assert_eq!(reply, ChatReply::new("Hi there!"));
        assert_eq!(model.direct_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn general_query_tool_is_opt_in() {
        let model: ChatModel = Arc::new(SplitModel {
            agent_text: String::new(),
            direct_text: String::new(),
            direct_calls: AtomicUsize::new(0),
        });
        let plain = ChatService::new(AgentConfig::default(), model.clone()).unwrap();
        assert!(plain.agent().tools.has(MENU_TOOL_NAME));
        assert!(!plain.agent().tools.has(GENERAL_QUERY_TOOL_NAME));

        let config = AgentConfig {
            general_query_tool: true,
            ..AgentConfig::default()
        };
        let extended = ChatService::new(config, model).unwrap();
        assert_eq!(extended.agent().tools.count(), 2);
    }
}
