use crate::constants::runs;
use crate::errors::ToolError;
use crate::services::latentsense_client::{LatentsenseClient, RunsQuery};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use serde_json::Value;
use std::sync::Arc;

const RUNS_TOOLS: &[&str] = &["get_project_runs", "get_run_results"];

/// Run history: listing and result lookup.
#[derive(Clone)]
pub struct RunsManager {
    logger: Logger,
    validation: Validation,
    client: Arc<LatentsenseClient>,
}

impl RunsManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<LatentsenseClient>) -> Self {
        Self {
            logger: logger.child("runs"),
            validation,
            client,
        }
    }

    /// Builds the listing query, applying defaults and rejecting unknown
    /// cog names or sort fields before anything is sent.
    pub fn parse_runs_query(&self, args: &Value) -> Result<RunsQuery, ToolError> {
        let defaults = RunsQuery::default();
        let filter_cog_name = self.validation.optional_string(args, "filter_cog_name");
        if let Some(cog) = filter_cog_name.as_deref() {
            self.validation
                .ensure_choice(cog, "filter_cog_name", runs::COG_NAMES)?;
        }
        let sort_by = args
            .get("sort_by")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.sort_by);
        self.validation
            .ensure_choice(&sort_by, "sort_by", runs::SORT_FIELDS)?;

        Ok(RunsQuery {
            filter_cog_name,
            filter_user_id: self.validation.optional_string(args, "filter_user_id"),
            filter_api_key_id: self.validation.optional_string(args, "filter_api_key_id"),
            page: self
                .validation
                .optional_u64(args, "page")?
                .unwrap_or(defaults.page),
            rows_per_page: self
                .validation
                .optional_u64(args, "rows_per_page")?
                .unwrap_or(defaults.rows_per_page),
            sort_by,
            descending: self
                .validation
                .optional_bool(args, "descending")
                .unwrap_or(defaults.descending),
        })
    }

    async fn get_project_runs(&self, args: &Value) -> Result<Value, ToolError> {
        let query = self.parse_runs_query(args)?;
        Ok(self.client.get_project_runs(&query).await?)
    }

    async fn get_run_results(&self, args: &Value) -> Result<Value, ToolError> {
        let run_id = self.validation.ensure_string(args, "run_id")?;
        Ok(self.client.get_run_results(&run_id).await?)
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for RunsManager {
    fn tools(&self) -> &'static [&'static str] {
        RUNS_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug(tool, None);
        match tool {
            "get_project_runs" => self.get_project_runs(&args).await,
            "get_run_results" => self.get_run_results(&args).await,
            _ => Err(ToolError::internal(format!("runs manager cannot serve {}", tool))),
        }
    }
}
