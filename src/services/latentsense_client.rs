use crate::constants::{network, runs, uploads};
use crate::errors::{ClientError, ToolError};
use crate::services::config::LatentsenseConfig;
use crate::services::logger::Logger;
use crate::utils::user_paths::{expand_home_path, upload_file_name};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;

/// Filters, paging and ordering for the project run listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RunsQuery {
    pub filter_cog_name: Option<String>,
    pub filter_user_id: Option<String>,
    pub filter_api_key_id: Option<String>,
    pub page: u64,
    pub rows_per_page: u64,
    pub sort_by: String,
    pub descending: bool,
}

impl Default for RunsQuery {
    fn default() -> Self {
        Self {
            filter_cog_name: None,
            filter_user_id: None,
            filter_api_key_id: None,
            page: runs::DEFAULT_PAGE,
            rows_per_page: runs::DEFAULT_ROWS_PER_PAGE,
            sort_by: runs::DEFAULT_SORT_BY.to_string(),
            descending: runs::DEFAULT_DESCENDING,
        }
    }
}

impl RunsQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let filters = [
            ("filterCogName", &self.filter_cog_name),
            ("filterUserId", &self.filter_user_id),
            ("filterApiKeyId", &self.filter_api_key_id),
        ];
        for (key, value) in filters {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        if self.page > 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.rows_per_page > 0 {
            pairs.push(("rowsPerPage", self.rows_per_page.to_string()));
        }
        if !self.sort_by.is_empty() {
            pairs.push(("sortBy", self.sort_by.clone()));
        }
        pairs.push(("descending", self.descending.to_string()));
        pairs
    }
}

/// Inputs for the reasoner-x knowledge graph endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeGraphRequest {
    pub files: Vec<String>,
    pub files2: Option<Vec<String>>,
    pub concepts_file: Option<String>,
    pub files1_name: Option<String>,
    pub files2_name: Option<String>,
}

#[derive(Debug)]
struct FilePart {
    field: &'static str,
    file_name: String,
    bytes: Vec<u8>,
}

#[derive(Debug)]
enum Payload {
    Empty,
    Json(Value),
    Multipart {
        parts: Vec<FilePart>,
        fields: Vec<(&'static str, String)>,
    },
}

/// One call against the vendor REST surface.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    query: Vec<(&'static str, String)>,
    payload: Payload,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            payload: Payload::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    fn multipart(mut self, parts: Vec<FilePart>, fields: Vec<(&'static str, String)>) -> Self {
        self.payload = Payload::Multipart { parts, fields };
        self
    }
}

/// Files destined for one multipart request, in upload order.
#[derive(Debug, Default)]
struct UploadSet {
    required: Vec<(&'static str, String)>,
    optional: Vec<(&'static str, String)>,
}

impl UploadSet {
    fn with_files(mut self, field: &'static str, paths: &[String]) -> Self {
        self.required
            .extend(paths.iter().map(|path| (field, path.clone())));
        self
    }

    /// An empty path means the extra file was not supplied and is left out.
    fn with_file(mut self, field: &'static str, path: &str) -> Self {
        if !path.is_empty() {
            self.required.push((field, path.to_string()));
        }
        self
    }

    fn with_optional_file(mut self, field: &'static str, path: &str) -> Self {
        self.optional.push((field, path.to_string()));
        self
    }
}

/// HTTP client for the Latentsense controller. Holds one pooled connection
/// with the API key preset as a default header.
#[derive(Clone)]
pub struct LatentsenseClient {
    logger: Logger,
    config: LatentsenseConfig,
    http: Client,
}

impl LatentsenseClient {
    pub fn new(logger: Logger, config: LatentsenseConfig) -> Result<Self, ToolError> {
        let mut api_key = HeaderValue::from_str(config.api_key()).map_err(|_| {
            ToolError::config_invalid("API key contains characters not allowed in a header")
        })?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(network::API_KEY_HEADER, api_key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;

        Ok(Self {
            logger: logger.child("client"),
            config,
            http,
        })
    }

    pub fn config(&self) -> &LatentsenseConfig {
        &self.config
    }

    pub async fn request(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let ApiRequest {
            method,
            endpoint,
            query,
            payload,
        } = request;
        let url = self.config.url_for(&endpoint);
        let mut builder = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart { parts, fields } => builder.multipart(build_form(parts, fields)),
        };

        let started = Instant::now();
        let outcome = self.dispatch(builder).await;
        let meta = serde_json::json!({
            "method": method.as_str(),
            "endpoint": endpoint,
            "duration_ms": started.elapsed().as_millis() as u64,
        });
        match &outcome {
            Ok(_) => self.logger.debug("vendor request ok", Some(&meta)),
            Err(err) => self.logger.warn(&err.to_string(), Some(&meta)),
        }
        outcome
    }

    async fn dispatch(&self, builder: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let response = builder.send().await?.error_for_status()?;
        response
            .json::<Value>()
            .await
            .map_err(|err| ClientError::request_failed(format!("invalid JSON response: {}", err)))
    }

    pub async fn get_project_runs(&self, query: &RunsQuery) -> Result<Value, ClientError> {
        let endpoint = format!("/api/runs/project/{}", self.config.project_id());
        self.request(ApiRequest::get(endpoint).query(query.to_query_pairs()))
            .await
    }

    pub async fn get_run_results(&self, run_id: &str) -> Result<Value, ClientError> {
        self.request(ApiRequest::get(format!("/api/runs/{}/results", run_id)))
            .await
    }

    pub async fn redact_pii(&self, files: &[String]) -> Result<Value, ClientError> {
        let endpoint = format!("/{}/redact-pii", self.config.project_id());
        let upload_set = UploadSet::default().with_files(uploads::FIELD_FILES, files);
        self.upload(endpoint, upload_set, Vec::new()).await
    }

    pub async fn redact_relevance(
        &self,
        files: &[String],
        relevance_term_file: &str,
        cutoff: f64,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("/{}/redact-relevance", self.config.project_id());
        let upload_set = UploadSet::default()
            .with_files(uploads::FIELD_FILES, files)
            .with_file(uploads::FIELD_RELEVANCE_TERM, relevance_term_file);
        let fields = vec![(uploads::FIELD_CUTOFF, format!("{:?}", cutoff))];
        self.upload(endpoint, upload_set, fields).await
    }

    pub async fn extract_relationships(
        &self,
        files: &[String],
        claim_concepts_file: &str,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("/{}/relationships-from-premises", self.config.project_id());
        let upload_set = UploadSet::default()
            .with_files(uploads::FIELD_FILES, files)
            .with_file(uploads::FIELD_CLAIM_CONCEPTS, claim_concepts_file);
        self.upload(endpoint, upload_set, Vec::new()).await
    }

    pub async fn create_knowledge_graph(
        &self,
        request: &KnowledgeGraphRequest,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("/{}/reasoner-x", self.config.project_id());
        let mut upload_set = UploadSet::default().with_files(uploads::FIELD_FILES, &request.files);
        if let Some(files2) = request.files2.as_deref().filter(|f| !f.is_empty()) {
            upload_set = upload_set.with_files(uploads::FIELD_FILES2, files2);
        }
        if let Some(concepts) = request.concepts_file.as_deref().filter(|p| !p.is_empty()) {
            upload_set = upload_set.with_optional_file(uploads::FIELD_CONCEPTS, concepts);
        }

        let mut fields = Vec::new();
        let names = [
            (uploads::FIELD_FILES1_NAME, &request.files1_name),
            (uploads::FIELD_FILES2_NAME, &request.files2_name),
        ];
        for (field, value) in names {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                fields.push((field, value.to_string()));
            }
        }
        self.upload(endpoint, upload_set, fields).await
    }

    pub async fn get_rex_message(&self, run_id: &str) -> Result<Value, ClientError> {
        let endpoint = format!("/api/chat/{}/message_rex", self.config.project_id());
        self.request(ApiRequest::get(endpoint).query(vec![("run_id", run_id.to_string())]))
            .await
    }

    pub async fn send_rex_message(
        &self,
        message: &str,
        run_id: &str,
        graph: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("/api/chat/{}/message_rex", self.config.project_id());
        let mut request = ApiRequest::post(endpoint).query(vec![
            ("message", message.to_string()),
            ("run_id", run_id.to_string()),
        ]);
        if let Some(graph) = graph.filter(|g| !is_empty_graph(g)) {
            request = request.json(graph.clone());
        }
        self.request(request).await
    }

    async fn upload(
        &self,
        endpoint: String,
        upload_set: UploadSet,
        fields: Vec<(&'static str, String)>,
    ) -> Result<Value, ClientError> {
        let parts = self.load_parts(upload_set).await?;
        self.request(ApiRequest::post(endpoint).multipart(parts, fields))
            .await
    }

    /// Checks every path before reading any of them, and reads all of them
    /// before anything is sent. Only regular files qualify; optional files
    /// that don't are skipped.
    async fn load_parts(&self, upload_set: UploadSet) -> Result<Vec<FilePart>, ClientError> {
        let mut resolved: Vec<(&'static str, String, PathBuf)> = Vec::new();
        for (field, raw) in upload_set.required {
            let path = expand_home_path(&raw);
            if !is_regular_file(&path).await {
                return Err(ClientError::file_not_found(raw));
            }
            resolved.push((field, raw, path));
        }
        for (field, raw) in upload_set.optional {
            let path = expand_home_path(&raw);
            if !is_regular_file(&path).await {
                self.logger.warn(
                    "skipping optional upload that is not a readable file",
                    Some(&serde_json::json!({ "field": field, "path": raw })),
                );
                continue;
            }
            resolved.push((field, raw, path));
        }

        let mut parts = Vec::with_capacity(resolved.len());
        for (field, raw, path) in resolved {
            let bytes = tokio::fs::read(&path).await.map_err(|err| {
                self.logger.warn(
                    "upload file could not be read",
                    Some(&serde_json::json!({ "path": raw, "error": err.to_string() })),
                );
                ClientError::file_not_found(raw.clone())
            })?;
            parts.push(FilePart {
                field,
                file_name: upload_file_name(&path),
                bytes,
            });
        }
        Ok(parts)
    }
}

async fn is_regular_file(path: &std::path::Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

fn is_empty_graph(graph: &Value) -> bool {
    match graph {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn build_form(parts: Vec<FilePart>, fields: Vec<(&'static str, String)>) -> Form {
    let mut form = Form::new();
    for part in parts {
        form = form.part(part.field, Part::bytes(part.bytes).file_name(part.file_name));
    }
    for (name, value) in fields {
        form = form.text(name, value);
    }
    form
}
