pub mod registry;
pub mod types;

pub use registry::ToolRegistry;
pub use types::{
    GeneralQueryTool, MenuTool, Tool, ToolError, ToolSchema, GENERAL_QUERY_TOOL_NAME, MENU_TOOL_NAME,
};
