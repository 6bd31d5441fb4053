use crate::errors::ToolError;
use crate::services::latentsense_client::LatentsenseClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use serde_json::Value;
use std::sync::Arc;

const REX_TOOLS: &[&str] = &["get_rex_message", "send_rex_message"];

/// Conversation with Rex over a ReasonerX run.
#[derive(Clone)]
pub struct RexManager {
    logger: Logger,
    validation: Validation,
    client: Arc<LatentsenseClient>,
}

impl RexManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<LatentsenseClient>) -> Self {
        Self {
            logger: logger.child("rex"),
            validation,
            client,
        }
    }

    async fn get_rex_message(&self, args: &Value) -> Result<Value, ToolError> {
        let run_id = self.validation.ensure_string(args, "run_id")?;
        Ok(self.client.get_rex_message(&run_id).await?)
    }

    async fn send_rex_message(&self, args: &Value) -> Result<Value, ToolError> {
        let message = self.validation.ensure_string(args, "message")?;
        let run_id = self.validation.ensure_string(args, "run_id")?;
        let graph = self.validation.optional_object(args, "graph");
        Ok(self
            .client
            .send_rex_message(&message, &run_id, graph.as_ref())
            .await?)
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for RexManager {
    fn tools(&self) -> &'static [&'static str] {
        REX_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug(tool, None);
        match tool {
            "get_rex_message" => self.get_rex_message(&args).await,
            "send_rex_message" => self.send_rex_message(&args).await,
            _ => Err(ToolError::internal(format!("rex manager cannot serve {}", tool))),
        }
    }
}
