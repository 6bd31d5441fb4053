use crate::errors::ToolError;
use crate::utils::suggest::did_you_mean;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .filter_map(|tool| {
            JSONSchema::compile(&tool.input_schema)
                .ok()
                .map(|schema| (tool.name.clone(), schema))
        })
        .collect()
});

pub fn tool_catalog() -> &'static [ToolDef] {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_CATALOG.iter().find(|tool| tool.name == name)
}

/// Schema check ahead of the handler. Tools missing from the catalog are
/// let through; the executor decides whether they exist.
pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let (Some(tool), Some(schema)) = (tool_by_name(tool_name), TOOL_VALIDATORS.get(tool_name))
    else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(args) {
        let problems = describe_schema_errors(errors, &tool.input_schema);
        return Err(ToolError::invalid_params(format!(
            "Invalid arguments for {}: {}",
            tool_name,
            problems.join("; ")
        ))
        .with_details(serde_json::json!({ "problems": problems })));
    }
    Ok(())
}

fn describe_schema_errors(errors: jsonschema::ErrorIterator, schema: &Value) -> Vec<String> {
    let known: Vec<&str> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut problems = Vec::new();
    for err in errors.take(10) {
        let location = err.instance_path.to_string();
        let field = location.trim_start_matches('/');
        match &err.kind {
            jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
                for name in unexpected {
                    let mut line = format!("unknown field '{}'", name);
                    if let Some(hint) = did_you_mean(name, &known) {
                        line.push_str(&format!(" ({})", hint));
                    }
                    problems.push(line);
                }
            }
            jsonschema::error::ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                problems.push(format!("missing required field '{}'", prop));
            }
            jsonschema::error::ValidationErrorKind::Type { kind } => {
                let target = if field.is_empty() { "arguments" } else { field };
                problems.push(format!("{} must be {}", target, format_type_kind(kind)));
            }
            _ => {
                let target = if field.is_empty() { "arguments" } else { field };
                problems.push(format!("{}: {}", target, err));
            }
        }
    }
    problems
}

fn format_type_kind(kind: &jsonschema::error::TypeKind) -> String {
    match kind {
        jsonschema::error::TypeKind::Single(primitive) => primitive.to_string(),
        jsonschema::error::TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "a valid value".to_string()
            } else {
                list.join(" or ")
            }
        }
    }
}
