use crate::constants::{env, network};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Connection settings for the vendor API. Built once at startup and never
/// mutated afterwards.
#[derive(Clone)]
pub struct LatentsenseConfig {
    api_key: String,
    project_id: String,
    base_url: String,
    timeout: Duration,
}

impl LatentsenseConfig {
    pub fn new(
        api_key: impl Into<String>,
        project_id: impl Into<String>,
        base_url: Option<&str>,
    ) -> Result<Self, ToolError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ToolError::config_missing(env::API_KEY));
        }
        let project_id = project_id.into().trim().to_string();
        if project_id.is_empty() {
            return Err(ToolError::config_missing(env::PROJECT_ID));
        }
        let base_url = normalize_base_url(base_url.unwrap_or(network::DEFAULT_BASE_URL))?;
        Ok(Self {
            api_key,
            project_id,
            base_url,
            timeout: Duration::from_millis(network::TIMEOUT_API_REQUEST_MS),
        })
    }

    pub fn from_env(logger: &Logger) -> Result<Self, ToolError> {
        Self::from_lookup(|key| std::env::var(key).ok(), logger)
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F, logger: &Logger) -> Result<Self, ToolError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let api_key = read(env::API_KEY).ok_or_else(|| ToolError::config_missing(env::API_KEY))?;
        let project_id =
            read(env::PROJECT_ID).ok_or_else(|| ToolError::config_missing(env::PROJECT_ID))?;
        let base_url = read(env::BASE_URL);
        let mut config = Self::new(api_key, project_id, base_url.as_deref())?;

        if let Some(raw) = read(env::TIMEOUT_MS) {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => logger.warn(
                    "ignoring invalid request timeout",
                    Some(&serde_json::json!({ "var": env::TIMEOUT_MS, "value": raw })),
                ),
            }
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl fmt::Debug for LatentsenseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatentsenseConfig")
            .field("api_key", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ToolError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| {
        ToolError::config_invalid(format!("{} is not a valid URL: {}", env::BASE_URL, err))
    })?;
    if !network::ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ToolError::config_invalid(format!(
            "{} must use http or https, got {}",
            env::BASE_URL,
            parsed.scheme()
        )));
    }
    Ok(trimmed.to_string())
}
