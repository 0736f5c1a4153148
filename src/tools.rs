//! Tool definitions and dispatch for agent-facing navigation.
//!
//! Each tool maps to a `Navigator` query. Definitions carry a JSON Schema so
//! clients can discover parameters; results come back as a single text
//! content block holding pretty-printed JSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{NavError, Result};
use crate::navigator::{ElementArg, Navigator};
use crate::types::CallDirection;

/// Maximum character length for a tool response before truncation.
const MAX_RESPONSE_CHARS: usize = 15_000;

/// A tool definition exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn element_schema(extra: Value) -> Value {
    let mut properties = json!({
        "element": {
            "type": "string",
            "description": "Symbol id, or a position as file:line[:column]"
        }
    });
    if let (Some(props), Some(extra)) = (properties.as_object_mut(), extra.as_object()) {
        props.extend(extra.clone());
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": ["element"]
    })
}

/// Returns every tool definition.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "nav_type_hierarchy".to_string(),
            description: "Show the full supertype tree of a class, interface or struct, plus its direct subtypes.".to_string(),
            input_schema: element_schema(json!({})),
        },
        ToolDefinition {
            name: "nav_call_hierarchy".to_string(),
            description: "Show who calls a function or method (callers), or what it calls (callees), as a tree.".to_string(),
            input_schema: element_schema(json!({
                "direction": {
                    "type": "string",
                    "enum": ["callers", "callees"],
                    "description": "Which way to walk (default: callers)"
                },
                "depth": {
                    "type": "number",
                    "description": "Levels to expand (default: 3, capped at 50)"
                }
            })),
        },
        ToolDefinition {
            name: "nav_implementations".to_string(),
            description: "List every type inheriting from a type, or every override of a method.".to_string(),
            input_schema: element_schema(json!({})),
        },
        ToolDefinition {
            name: "nav_super_methods".to_string(),
            description: "List the ancestor methods a method overrides or implements, nearest first.".to_string(),
            input_schema: element_schema(json!({})),
        },
        ToolDefinition {
            name: "nav_symbol_search".to_string(),
            description: "Fuzzy-search symbols by name across every supported language.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "pattern": {
                        "type": "string",
                        "description": "Substring or abbreviation, e.g. 'USvc' for UserService"
                    },
                    "include_libraries": {
                        "type": "boolean",
                        "description": "Also search library symbols (default: false)"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results (default: 50)"
                    }
                },
                "required": ["pattern"]
            }),
        },
    ]
}

/// Dispatches a tool call to the matching handler.
pub fn handle_tool_call(nav: &Navigator, tool_name: &str, args: Value) -> Result<Value> {
    match tool_name {
        "nav_type_hierarchy" => {
            let element = element_arg(&args)?;
            text_result(render(&nav.type_hierarchy(&element)?)?)
        }
        "nav_call_hierarchy" => handle_call_hierarchy(nav, &args),
        "nav_implementations" => {
            let element = element_arg(&args)?;
            text_result(render(&nav.implementations(&element)?)?)
        }
        "nav_super_methods" => {
            let element = element_arg(&args)?;
            text_result(render(&nav.super_methods(&element)?)?)
        }
        "nav_symbol_search" => handle_symbol_search(nav, &args),
        _ => Err(NavError::InvalidRequest {
            message: format!("unknown tool: {}", tool_name),
        }),
    }
}

fn handle_call_hierarchy(nav: &Navigator, args: &Value) -> Result<Value> {
    let element = element_arg(args)?;
    let direction = match args.get("direction").and_then(|v| v.as_str()) {
        None => CallDirection::Callers,
        Some(s) => CallDirection::from_str(s).ok_or_else(|| NavError::InvalidRequest {
            message: format!("direction must be 'callers' or 'callees', got '{}'", s),
        })?,
    };
    let depth = args
        .get("depth")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize);

    text_result(render(&nav.call_hierarchy(&element, direction, depth)?)?)
}

fn handle_symbol_search(nav: &Navigator, args: &Value) -> Result<Value> {
    let pattern = args
        .get("pattern")
        .and_then(|v| v.as_str())
        .ok_or_else(|| NavError::InvalidRequest {
            message: "missing required parameter: pattern".to_string(),
        })?;
    let include_libraries = args
        .get("include_libraries")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let limit = args
        .get("limit")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize);

    let matches = nav.search_symbols(pattern, include_libraries, limit)?;
    text_result(serde_json::to_string_pretty(&matches)?)
}

fn element_arg(args: &Value) -> Result<ElementArg> {
    args.get("element")
        .and_then(|v| v.as_str())
        .ok_or_else(|| NavError::InvalidRequest {
            message: "missing required parameter: element".to_string(),
        })?
        .parse()
}

/// The payload for a query answer; `None` becomes `{"status":"not_applicable"}`.
pub fn render<T: Serialize>(answer: &Option<T>) -> Result<String> {
    Ok(match answer {
        Some(value) => serde_json::to_string_pretty(value)?,
        None => json!({ "status": "not_applicable" }).to_string(),
    })
}

fn text_result(output: String) -> Result<Value> {
    Ok(json!({
        "content": [{ "type": "text", "text": truncate_response(&output) }]
    }))
}

/// Truncates a string to the maximum response character limit, appending
/// a truncation notice if necessary.
pub fn truncate_response(s: &str) -> String {
    if s.len() <= MAX_RESPONSE_CHARS {
        s.to_string()
    } else {
        let mut end = MAX_RESPONSE_CHARS;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}\n\n[... truncated at {} chars]", &s[..end], end)
    }
}
