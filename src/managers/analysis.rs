use crate::constants::uploads;
use crate::errors::ToolError;
use crate::services::latentsense_client::{KnowledgeGraphRequest, LatentsenseClient};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use serde_json::Value;
use std::sync::Arc;

const ANALYSIS_TOOLS: &[&str] = &["extract_relationships", "create_knowledge_graph"];

/// Relationship extraction and knowledge graph construction.
#[derive(Clone)]
pub struct AnalysisManager {
    logger: Logger,
    validation: Validation,
    client: Arc<LatentsenseClient>,
}

impl AnalysisManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<LatentsenseClient>) -> Self {
        Self {
            logger: logger.child("analysis"),
            validation,
            client,
        }
    }

    async fn extract_relationships(&self, args: &Value) -> Result<Value, ToolError> {
        let files = self.validation.ensure_string_list(args, "files")?;
        let claim_concepts_file = self.validation.ensure_string(args, "claim_concepts_file")?;
        Ok(self
            .client
            .extract_relationships(&files, &claim_concepts_file)
            .await?)
    }

    pub fn parse_graph_request(&self, args: &Value) -> Result<KnowledgeGraphRequest, ToolError> {
        let name_or = |key: &str, default: &str| {
            args.get(key)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };
        Ok(KnowledgeGraphRequest {
            files: self.validation.ensure_string_list(args, "files")?,
            files2: self
                .validation
                .optional_string_list(args, "files2")?
                .filter(|files| !files.is_empty()),
            concepts_file: self.validation.optional_string(args, "concepts_file"),
            files1_name: Some(name_or("files1_name", uploads::DEFAULT_FILES1_NAME)),
            files2_name: Some(name_or("files2_name", uploads::DEFAULT_FILES2_NAME)),
        })
    }

    async fn create_knowledge_graph(&self, args: &Value) -> Result<Value, ToolError> {
        let request = self.parse_graph_request(args)?;
        Ok(self.client.create_knowledge_graph(&request).await?)
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for AnalysisManager {
    fn tools(&self) -> &'static [&'static str] {
        ANALYSIS_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug(tool, None);
        match tool {
            "extract_relationships" => self.extract_relationships(&args).await,
            "create_knowledge_graph" => self.create_knowledge_graph(&args).await,
            _ => Err(ToolError::internal(format!(
                "analysis manager cannot serve {}",
                tool
            ))),
        }
    }
}
