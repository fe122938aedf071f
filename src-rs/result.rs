use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output the agent loop reports when it runs out of iterations.
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to max iterations.";

/// Body returned to HTTP callers when a request fails.
pub const SERVER_ERROR_MESSAGE: &str = "Server error occurred.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    IterationLimit,
}

/// One tool invocation made during an agent run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntermediateStep {
    pub tool: String,
    pub args: Value,
    pub observation: String,
}

impl IntermediateStep {
    pub fn new(tool: &str, args: Value, observation: impl Into<String>) -> Self {
        Self {
            tool: tool.to_string(),
            args,
            observation: observation.into(),
        }
    }
}

/// Result of one completed agent run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRun {
    pub output: Option<String>,
    pub intermediate_steps: Vec<IntermediateStep>,
    pub stop_reason: StopReason,
}

impl AgentRun {
    pub fn completed(output: Option<String>, intermediate_steps: Vec<IntermediateStep>) -> Self {
        Self {
            output,
            intermediate_steps,
            stop_reason: StopReason::Completed,
        }
    }

    pub fn iteration_limit(intermediate_steps: Vec<IntermediateStep>) -> Self {
        Self {
            output: Some(ITERATION_LIMIT_MESSAGE.to_string()),
            intermediate_steps,
            stop_reason: StopReason::IterationLimit,
        }
    }

    /// Builds a run from a bare output string, as reported by orchestrators
    /// that signal the iteration cap only through their output text.
    /// The comparison is exact: no trimming, case-sensitive.
    pub fn from_output(output: Option<String>, intermediate_steps: Vec<IntermediateStep>) -> Self {
        let stop_reason = match output.as_deref() {
            Some(ITERATION_LIMIT_MESSAGE) => StopReason::IterationLimit,
            _ => StopReason::Completed,
        };
        Self {
            output,
            intermediate_steps,
            stop_reason,
        }
    }

    pub fn used_tools(&self) -> bool {
        !self.intermediate_steps.is_empty()
    }
}

/// Text of a direct, tool-free model call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub output: String,
}

impl ChatReply {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn server_error() -> Self {
        Self::new(SERVER_ERROR_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_output_detects_exact_sentinel_only() {
        let limit = AgentRun::from_output(Some(ITERATION_LIMIT_MESSAGE.to_string()), vec![]);
        assert_eq!(limit.stop_reason, StopReason::IterationLimit);

        let lowered = AgentRun::from_output(Some(ITERATION_LIMIT_MESSAGE.to_lowercase()), vec![]);
        assert_eq!(lowered.stop_reason, StopReason::Completed);

        let padded = AgentRun::from_output(Some(format!(" {} ", ITERATION_LIMIT_MESSAGE)), vec![]);
        assert_eq!(padded.stop_reason, StopReason::Completed);

        let absent = AgentRun::from_output(None, vec![]);
        assert_eq!(absent.stop_reason, StopReason::Completed);
    }

    #[test]
    fn iteration_limit_run_carries_sentinel_output() {
        let run = AgentRun::iteration_limit(vec![IntermediateStep::new(
            "getMenu",
            json!({"category": "lunch"}),
            "Dal Tadka, Rice, Roti, Salad",
        )]);
        assert_eq!(run.output.as_deref(), Some(ITERATION_LIMIT_MESSAGE));
        assert!(run.used_tools());
    }

    #[test]
    fn chat_reply_serializes_as_output_object() {
        let body = serde_json::to_value(ChatReply::server_error()).unwrap();
        assert_eq!(body, json!({"output": "Server error occurred."}));
    }
}
