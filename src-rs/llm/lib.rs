pub mod gemini_adapter;
pub mod rotation;
pub mod types;

pub use gemini_adapter::{GeminiAdapter, GeminiConfig};
pub use rotation::Rotator;
pub use types::{ChatModel, CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, ToolCall};
