use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::mcp::catalog::validate_tool_args;
use crate::mcp::envelope::{render_tool_result, ToolOutput};
use crate::services::logger::Logger;
use crate::utils::suggest::did_you_mean;

use serde_json::Value;

/// A group of tools served by one manager.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn tools(&self) -> &'static [&'static str];

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: Vec<Arc<dyn ToolHandler>>) -> Self {
        let mut map: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for handler in handlers {
            for tool in handler.tools() {
                map.insert((*tool).to_string(), handler.clone());
            }
        }
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(map),
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    fn unknown_tool(&self, tool: &str) -> ToolError {
        let names = self.tool_names();
        let candidates: Vec<&str> = names.iter().map(String::as_str).collect();
        let hint = did_you_mean(tool, &candidates)
            .unwrap_or_else(|| format!("Available tools: {}", candidates.join(", ")));
        ToolError::invalid_params(format!("Unknown tool: {}", tool)).with_hint(hint)
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let Some(handler) = self.handlers.get(tool) else {
            return Err(self.unknown_tool(tool));
        };
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        validate_tool_args(tool, &args)?;

        let call_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call started",
            Some(&serde_json::json!({ "tool": tool, "call_id": call_id })),
        );
        let result = handler.handle(tool, args).await;
        let meta = serde_json::json!({
            "tool": tool,
            "call_id": call_id,
            "duration_ms": started.elapsed().as_millis() as u64,
        });
        match &result {
            Ok(_) => self.logger.debug("tool call finished", Some(&meta)),
            Err(err) => self.logger.info(
                &format!("tool call failed: {}", err.message),
                Some(&meta),
            ),
        }
        result
    }

    /// Runs a tool and renders the outcome as the text the agent sees.
    pub async fn call(&self, tool: &str, args: Value) -> ToolOutput {
        render_tool_result(self.execute(tool, args).await)
    }
}
