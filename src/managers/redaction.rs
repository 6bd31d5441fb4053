use crate::errors::ToolError;
use crate::services::latentsense_client::LatentsenseClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use serde_json::Value;
use std::sync::Arc;

const REDACTION_TOOLS: &[&str] = &["redact_pii", "redact_relevance"];

#[derive(Clone)]
pub struct RedactionManager {
    logger: Logger,
    validation: Validation,
    client: Arc<LatentsenseClient>,
}

impl RedactionManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<LatentsenseClient>) -> Self {
        Self {
            logger: logger.child("redaction"),
            validation,
            client,
        }
    }

    async fn redact_pii(&self, args: &Value) -> Result<Value, ToolError> {
        let files = self.validation.ensure_string_list(args, "files")?;
        Ok(self.client.redact_pii(&files).await?)
    }

    async fn redact_relevance(&self, args: &Value) -> Result<Value, ToolError> {
        let cutoff = self.validation.ensure_number(args, "cutoff")?;
        self.validation.ensure_in_range(cutoff, "cutoff", 0.0, 1.0)?;
        let files = self.validation.ensure_string_list(args, "files")?;
        let relevance_term_file = self.validation.ensure_string(args, "relevance_term_file")?;
        Ok(self
            .client
            .redact_relevance(&files, &relevance_term_file, cutoff)
            .await?)
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for RedactionManager {
    fn tools(&self) -> &'static [&'static str] {
        REDACTION_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug(tool, None);
        match tool {
            "redact_pii" => self.redact_pii(&args).await,
            "redact_relevance" => self.redact_relevance(&args).await,
            _ => Err(ToolError::internal(format!(
                "redaction manager cannot serve {}",
                tool
            ))),
        }
    }
}
