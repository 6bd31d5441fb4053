use thiserror::Error;

/// Failures raised by the vendor client. Nothing else escapes it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    #[error("API request failed: {message}")]
    RequestFailed { message: String },
}

impl ClientError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::request_failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ClientError;

    #[test]
    fn display_matches_tool_facing_messages() {
        assert_eq!(
            ClientError::file_not_found("/tmp/missing.txt").to_string(),
            "File not found: /tmp/missing.txt"
        );
        assert_eq!(
            ClientError::request_failed("connection refused").to_string(),
            "API request failed: connection refused"
        );
    }
}
