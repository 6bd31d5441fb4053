use crate::errors::ClientError;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    NotFound,
    Retryable,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            retryable: matches!(kind, ToolErrorKind::Retryable),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn retryable(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Retryable, "RETRYABLE", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }

    pub fn config_missing(var: &str) -> Self {
        Self::new(
            ToolErrorKind::InvalidParams,
            "CONFIG_MISSING",
            format!("{} environment variable is required", var),
        )
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "CONFIG_INVALID", message)
    }

    /// Text handed back to the calling agent. The hint, when present,
    /// follows the message on its own line.
    pub fn to_display_string(&self) -> String {
        match &self.hint {
            Some(hint) => format!("Error: {}\n{}", self.message, hint),
            None => format!("Error: {}", self.message),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<ClientError> for ToolError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::FileNotFound { path } => ToolError::not_found(err.to_string())
                .with_details(serde_json::json!({ "path": path })),
            ClientError::RequestFailed { .. } => ToolError::retryable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let err: ToolError = ClientError::file_not_found("a.txt").into();
        assert_eq!(err.kind, ToolErrorKind::NotFound);
        assert_eq!(err.to_display_string(), "Error: File not found: a.txt");

        let err: ToolError = ClientError::request_failed("boom").into();
        assert!(err.retryable);
        assert_eq!(err.to_display_string(), "Error: API request failed: boom");
    }

    #[test]
    fn hint_is_appended_on_its_own_line() {
        let err = ToolError::invalid_params("sort_by must be one of: time, cost")
            .with_hint("Did you mean: time?");
        assert_eq!(
            err.to_display_string(),
            "Error: sort_by must be one of: time, cost\nDid you mean: time?"
        );
    }
}
