use crate::errors::ToolError;
use serde_json::Value;

/// Text returned to the calling agent for one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub fn failure(err: &ToolError) -> Self {
        Self {
            text: err.to_display_string(),
            is_error: true,
        }
    }

    /// MCP `tools/call` result body.
    pub fn into_call_result(self) -> Value {
        serde_json::json!({
            "content": [ { "type": "text", "text": self.text } ],
            "isError": self.is_error,
        })
    }
}

/// Pretty JSON on success, `Error: ...` otherwise.
pub fn render_tool_result(result: Result<Value, ToolError>) -> ToolOutput {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => ToolOutput::success(text),
            Err(err) => ToolOutput::failure(&ToolError::internal(format!(
                "Failed to serialize result: {}",
                err
            ))),
        },
        Err(err) => ToolOutput::failure(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_indented_json_that_round_trips() {
        let payload = serde_json::json!({"runs": [{"id": "r1", "cost": 0.25}], "total": 1});
        let output = render_tool_result(Ok(payload.clone()));
        assert!(!output.is_error);
        assert!(output.text.contains("\n  \"runs\""));
        let parsed: Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn failure_is_prefixed_and_flagged() {
        let output = render_tool_result(Err(ToolError::retryable(
            "API request failed: HTTP status server error (500 Internal Server Error)",
        )));
        assert!(output.is_error);
        assert!(output.text.starts_with("Error: API request failed: "));

        let body = output.into_call_result();
        assert_eq!(body["isError"], Value::Bool(true));
        assert_eq!(body["content"][0]["type"], "text");
    }
}
