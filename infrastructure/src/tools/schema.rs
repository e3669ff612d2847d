//! JSON Schema for OpenAI-style function calling.
//!
//! Handles param_type → JSON Schema type mapping:
//! - `"string"` → `"string"`
//! - `"number"` → `"number"`
//! - `"integer"` → `"integer"`
//! - `"boolean"` → `"boolean"`
//! - anything else → `"string"`

use orchestrator_domain::ToolDefinition;
use serde_json::{Map, Value, json};

/// `{"type":"function","function":{name, description, parameters}}`
pub fn function_schema(tool: &ToolDefinition) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &tool.parameters {
        let schema_type = match param.param_type.as_str() {
            "number" => "number",
            "integer" => "integer",
            "boolean" => "boolean",
            _ => "string",
        };
        properties.insert(
            param.name.clone(),
            json!({
                "type": schema_type,
                "description": param.description,
            }),
        );
        if param.required {
            required.push(json!(param.name));
        }
    }

    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        }
    })
}

/// Schemas for a list of offered tools, in the given order
pub fn function_schemas(tools: &[ToolDefinition]) -> Vec<Value> {
    tools.iter().map(function_schema).collect()
}
