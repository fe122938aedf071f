use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm::{ChatModel, ProviderError};

pub const MENU_TOOL_NAME: &str = "getMenu";
pub const GENERAL_QUERY_TOOL_NAME: &str = "generalQuery";

const NO_MENU: &str = "No menu available for this category";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Option<Value>,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("tool already registered: {0}")]
    AlreadyRegistered(String),
    #[error("model call failed: {0}")]
    Model(#[from] ProviderError),
}

/// Today's menu, keyed by lowercase category.
#[derive(Clone, Debug)]
pub struct MenuTool {
    menus: BTreeMap<String, String>,
}

impl Default for MenuTool {
    fn default() -> Self {
        Self::new([
            ("breakfast", "Aloo Paratha, Poha, Masala Chai"),
            ("lunch", "Dal Tadka, Rice, Roti, Salad"),
            ("dinner", "Paneer Butter Masala, Naan, Jeera Rice"),
        ])
    }
}

impl MenuTool {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let menus = entries
            .into_iter()
            .map(|(category, dishes)| (category.to_lowercase(), dishes.to_string()))
            .collect();
        Self { menus }
    }

    pub fn lookup(&self, category: &str) -> String {
        self.menus
            .get(&category.to_lowercase())
            .cloned()
            .unwrap_or_else(|| NO_MENU.to_string())
    }
}

/// Hands a free-form question straight to the chat model.
#[derive(Clone)]
pub struct GeneralQueryTool {
    model: ChatModel,
}

impl GeneralQueryTool {
    pub fn new(model: ChatModel) -> Self {
        Self { model }
    }
}

#[derive(Clone)]
pub enum Tool {
    Menu(MenuTool),
    GeneralQuery(GeneralQueryTool),
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Menu(_) => MENU_TOOL_NAME,
            Tool::GeneralQuery(_) => GENERAL_QUERY_TOOL_NAME,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::Menu(_) => {
                "Returns today's menu for the given category (breakfast, lunch or dinner). \
                 Use this tool to directly answer user menu questions."
            }
            Tool::GeneralQuery(_) => "Use this tool for any question not related to menus.",
        }
    }

    pub fn schema(&self) -> ToolSchema {
        let (field, about) = match self {
            Tool::Menu(_) => ("category", "Type of food. Example: breakfast, lunch, dinner"),
            Tool::GeneralQuery(_) => ("question", "User's general question"),
        };
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: Some(json!({
                "type": "object",
                "properties": {
                    field: {"type": "string", "description": about}
                },
                "required": [field]
            })),
        }
    }

    pub fn invoke(&self, args: &Value) -> Result<String, ToolError> {
        match self {
            Tool::Menu(menu) => {
                let category = string_arg(args, "category")?;
                Ok(menu.lookup(category))
            }
            Tool::GeneralQuery(query) => {
                let question = string_arg(args, "question")?;
                let reply = query.model.ask(question)?;
                Ok(reply.text)
            }
        }
    }
}

fn string_arg<'a>(args: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidArgs(format!("expected string field `{}`", field)))
}
