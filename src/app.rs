use crate::errors::ToolError;
use crate::managers;
use crate::mcp::catalog::tool_catalog;
use crate::services::config::LatentsenseConfig;
use crate::services::latentsense_client::LatentsenseClient;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use std::sync::Arc;

/// Everything a tool call needs: the shared vendor client and the handlers
/// built around it. Dropping the app releases the client's connection pool.
pub struct App {
    pub logger: Logger,
    pub client: Arc<LatentsenseClient>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(executor: &ToolExecutor) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !executor.has_tool(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json needs a registered handler.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    /// Reads the configuration from the environment and builds the app.
    pub fn initialize() -> Result<Self, ToolError> {
        let logger = Logger::new("latentsense");
        let config = LatentsenseConfig::from_env(&logger)?;
        Self::with_config(logger, config)
    }

    pub fn with_config(logger: Logger, config: LatentsenseConfig) -> Result<Self, ToolError> {
        let validation = Validation::new();
        let client = Arc::new(LatentsenseClient::new(logger.clone(), config)?);

        let handlers: Vec<Arc<dyn ToolHandler>> = vec![
            Arc::new(managers::runs::RunsManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
            Arc::new(managers::redaction::RedactionManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
            Arc::new(managers::analysis::AnalysisManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
            Arc::new(managers::rex::RexManager::new(
                logger.clone(),
                validation,
                client.clone(),
            )),
        ];
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        Self::validate_tool_wiring(&tool_executor)?;

        logger.info(
            "client ready",
            Some(&serde_json::json!({
                "project_id": client.config().project_id(),
                "base_url": client.config().base_url(),
                "timeout_ms": client.config().timeout().as_millis() as u64,
            })),
        );

        Ok(Self {
            logger,
            client,
            tool_executor,
        })
    }
}
