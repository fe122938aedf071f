use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::{ChatModel, CompletionRequest, Message};
use crate::result::{AgentRun, IntermediateStep};
use crate::tools::{ToolError, ToolRegistry};

/// Tool-calling loop over a chat model.
pub struct Agent {
    pub config: AgentConfig,
    pub tools: ToolRegistry,
    model: ChatModel,
}

impl Agent {
    pub fn new(mut config: AgentConfig, model: ChatModel, tools: ToolRegistry) -> Self {
        if config.max_iterations == 0 {
            config.max_iterations = AgentConfig::default().max_iterations;
        }
        if config.system_prompt.is_empty() {
            config.system_prompt = AgentConfig::default().system_prompt;
        }
        Self { config, tools, model }
    }

    /// Runs the loop for one input.
    ///
    /// Each iteration asks the model once. A reply without tool calls ends the
    /// run with its text; otherwise every call is executed, recorded as an
    /// intermediate step and fed back. Running out of iterations is not an
    /// error: the run reports [`crate::result::StopReason::IterationLimit`].
    pub fn run(&self, input: &str) -> Result<AgentRun, AgentError> {
        let mut messages = vec![Message::system(&self.config.system_prompt), Message::user(input)];
        let tool_schemas = if self.tools.count() > 0 {
            Some(self.tools.get_schemas())
        } else {
            None
        };
        let mut steps = Vec::new();

        for iteration in 0..self.config.max_iterations {
            let request = CompletionRequest {
                messages: messages.clone(),
                tools: tool_schemas.clone(),
            };
            let response = self.model.complete(request)?;

            if response.tool_calls.is_empty() {
                debug!(iteration, steps = steps.len(), "agent finished");
                let output = Some(response.content).filter(|text| !text.is_empty());
                return Ok(AgentRun::from_output(output, steps));
            }

            messages.push(Message::assistant(&response.content, response.tool_calls.clone()));

            for call in response.tool_calls {
                debug!(iteration, tool = %call.name, "agent calling tool");
                let observation = match self.tools.execute(&call.name, &call.args) {
                    Ok(text) => text,
                    Err(ToolError::Model(err)) => return Err(AgentError::Provider(err)),
                    Err(err) => {
                        warn!(tool = %call.name, error = %err, "tool call rejected");
                        format!("Tool {} error: {}", call.name, err)
                    }
                };
                messages.push(Message::tool(&call.name, &observation));
                steps.push(IntermediateStep::new(&call.name, call.args, observation));
            }
        }

        debug!(steps = steps.len(), "agent stopped at iteration limit");
        Ok(AgentRun::iteration_limit(steps))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use super::*;
    use crate::llm::{LLMResponse, ProviderAdapter, ProviderError, ToolCall};
    use crate::result::{StopReason, ITERATION_LIMIT_MESSAGE};
    use crate::tools::{MenuTool, Tool};

    /// Replays canned responses and records every request it sees.
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<LLMResponse, ProviderError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<LLMResponse, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl ProviderAdapter for ScriptedModel {
        fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::new("script_exhausted", "no reply", false)))
        }
    }

    fn text(content: &str) -> Result<LLMResponse, ProviderError> {
        Ok(LLMResponse {
            content: content.to_string(),
            tool_calls: Vec::new(),
        })
    }

    fn call(name: &str, args: Value) -> Result<LLMResponse, ProviderError> {
        Ok(LLMResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                name: name.to_string(),
                args,
            }],
        })
    }

    fn menu_agent(model: Arc<ScriptedModel>) -> Agent {
        let mut tools = ToolRegistry::new();
        tools.register(Tool::Menu(MenuTool::default())).unwrap();
        Agent::new(AgentConfig::default(), model, tools)
    }

    #[test]
    fn direct_answer_has_no_steps() {
        let model = ScriptedModel::new(vec![text("Hello! How can I help?")]);
        let run = menu_agent(model.clone()).run("Hello!").unwrap();

        assert_eq!(run.output.as_deref(), Some("Hello! How can I help?"));
        assert!(run.intermediate_steps.is_empty());
        assert_eq!(run.stop_reason, StopReason::Completed);

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests[0].messages[0].role, "system");
        assert_eq!(requests[0].messages[1].content, "Hello!");
        assert_eq!(requests[0].tools.as_ref().map(|t| t.len()), Some(1));
    }

    #[test]
    fn tool_call_then_answer() {
        let model = ScriptedModel::new(vec![
            call("getMenu", json!({"category": "lunch"})),
            text("Here is today's lunch: Dal Tadka, Rice, Roti, Salad"),
        ]);
        let run = menu_agent(model.clone()).run("What's for lunch?").unwrap();

        assert_eq!(run.stop_reason, StopReason::Completed);
        assert_eq!(run.intermediate_steps.len(), 1);
        assert_eq!(run.intermediate_steps[0].observation, "Dal Tadka, Rice, Roti, Salad");
        assert_eq!(
            run.output.as_deref(),
            Some("Here is today's lunch: Dal Tadka, Rice, Roti, Salad")
        );

        let requests = model.requests.lock().unwrap();
        let second = &requests[1].messages;
        assert_eq!(second[2].role, "assistant");
        assert_eq!(second[3].role, "tool");
        assert_eq!(second[3].content, "Dal Tadka, Rice, Roti, Salad");
    }

    #[test]
    fn iteration_limit_reports_sentinel() {
        let model = ScriptedModel::new(vec![
            call("getMenu", json!({"category": "lunch"})),
            call("getMenu", json!({"category": "dinner"})),
        ]);
        let run = menu_agent(model).run("lunch and dinner?").unwrap();

        assert_eq!(run.stop_reason, StopReason::IterationLimit);
        assert_eq!(run.output.as_deref(), Some(ITERATION_LIMIT_MESSAGE));
        assert_eq!(run.intermediate_steps.len(), 2);
        assert_eq!(run.intermediate_steps[0].observation, "Dal Tadka, Rice, Roti, Salad");
    }

    #[test]
    fn unknown_tool_becomes_error_observation() {
        let model = ScriptedModel::new(vec![call("weather", json!({})), text("Sorry, I can't check that.")]);
        let run = menu_agent(model).run("weather?").unwrap();

        assert_eq!(run.intermediate_steps[0].observation, "Tool weather error: tool not found: weather");
        assert_eq!(run.output.as_deref(), Some("Sorry, I can't check that."));
    }

    #[test]
    fn final_text_matching_limit_message_counts_as_limit() {
        let model = ScriptedModel::new(vec![
            call("getMenu", json!({"category": "lunch"})),
            text(ITERATION_LIMIT_MESSAGE),
        ]);
        let run = menu_agent(model).run("What's for lunch?").unwrap();
        assert_eq!(run.stop_reason, StopReason::IterationLimit);
        assert_eq!(run.intermediate_steps[0].observation, "Dal Tadka, Rice, Roti, Salad");
    }

    #[test]
    fn empty_final_text_is_no_output() {
        let model = ScriptedModel::new(vec![text("")]);
        let run = menu_agent(model).run("Hello!").unwrap();
        assert_eq!(run.output, None);
    }

    #[test]
    fn model_failure_aborts_run() {
        let model = ScriptedModel::new(vec![Err(ProviderError::new("network_error", "connection reset", true))]);
        let err = menu_agent(model).run("Hello!").unwrap_err();
        assert!(matches!(err, AgentError::Provider(e) if e.code == "network_error"));
    }
}
