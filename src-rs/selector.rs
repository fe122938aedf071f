use tracing::{debug, info};

use crate::result::{AgentRun, ChatReply, ModelReply, StopReason, ITERATION_LIMIT_MESSAGE};

/// Picks the reply for one agent run.
///
/// A run that used a tool and finished normally returns its output. A run
/// that used a tool but hit the iteration cap returns the first tool
/// observation; output that is exactly the iteration-limit message counts as
/// hitting the cap whatever the stop reason says. Anything else asks the
/// model directly through `fallback`, which runs at most once and only after
/// the run has been inspected. An empty output string counts as no output.
pub fn select<F, E>(run: AgentRun, fallback: F) -> Result<ChatReply, E>
where
    F: FnOnce() -> Result<ModelReply, E>,
{
    let used = run.used_tools();
    let output = run.output.filter(|text| !text.is_empty());
    let stop_reason = match output.as_deref() {
        Some(ITERATION_LIMIT_MESSAGE) => StopReason::IterationLimit,
        _ => run.stop_reason,
    };

    match (used, output, stop_reason) {
        (true, Some(output), StopReason::Completed) => {
            debug!("agent answered after using a tool");
            Ok(ChatReply::new(output))
        }
        (true, Some(_), StopReason::IterationLimit) => {
            debug!("agent hit its iteration limit, returning first tool observation");
            let mut steps = run.intermediate_steps.into_iter();
            let observation = steps.next().map(|step| step.observation).unwrap_or_default();
            Ok(ChatReply::new(observation))
        }
        _ => {
            info!(tool_used = used, "agent produced no usable answer, asking model directly");
            let reply = fallback()?;
            Ok(ChatReply::new(reply.text))
        }
    }
}
