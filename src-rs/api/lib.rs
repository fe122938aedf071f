pub use crate::chat::ChatService;
pub use crate::result::ChatReply;

pub mod handlers;
pub mod server;

pub use handlers::{AppState, ChatRequest, DEFAULT_INPUT};
pub use server::{router, ChatServer};
