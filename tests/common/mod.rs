#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use latentsense::app::App;
use latentsense::services::config::LatentsenseConfig;
use latentsense::services::logger::{LogLevel, Logger};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub static ENV_LOCK: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

pub const TEST_API_KEY: &str = "test-key-123";
pub const TEST_PROJECT_ID: &str = "proj-1";

#[derive(Debug, Clone)]
pub struct MultipartPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn multipart_parts(&self) -> Vec<MultipartPart> {
        let Some(boundary) = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.split("boundary=").nth(1))
            .map(|b| b.trim_matches('"').to_string())
        else {
            return Vec::new();
        };
        let disposition =
            Regex::new(r#"name="([^"]*)"(?:; filename="([^"]*)")?"#).expect("disposition regex");
        let body = String::from_utf8_lossy(&self.body).into_owned();
        let delimiter = format!("--{}", boundary);

        body.split(delimiter.as_str())
            .filter_map(|segment| {
                let (headers, content) = segment.split_once("\r\n\r\n")?;
                let captures = disposition.captures(headers)?;
                Some(MultipartPart {
                    name: captures[1].to_string(),
                    file_name: captures.get(2).map(|m| m.as_str().to_string()),
                    content: content.strip_suffix("\r\n").unwrap_or(content).to_string(),
                })
            })
            .collect()
    }

    pub fn part_names(&self) -> Vec<String> {
        self.multipart_parts().into_iter().map(|p| p.name).collect()
    }

    pub fn text_field(&self, name: &str) -> Option<String> {
        self.multipart_parts()
            .into_iter()
            .find(|p| p.name == name && p.file_name.is_none())
            .map(|p| p.content)
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    body: Value,
    slow_marker: Option<(String, Duration)>,
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let query = uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        api_key: header("x-api-key"),
        content_type: header("content-type"),
        body: body.to_vec(),
    };
    let delay = state.slow_marker.as_ref().and_then(|(marker, delay)| {
        uri.to_string().contains(marker.as_str()).then_some(*delay)
    });
    state.requests.lock().expect("requests lock").push(recorded);
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    (state.status, Json(state.body.clone()))
}

/// Stand-in for the vendor API that records every request it receives.
pub struct MockVendor {
    pub base_url: String,
    state: MockState,
    task: tokio::task::JoinHandle<()>,
}

impl MockVendor {
    pub async fn start() -> Self {
        Self::with_response(StatusCode::OK, serde_json::json!({"status": "ok", "items": [1, 2]}))
            .await
    }

    pub async fn with_response(status: StatusCode, body: Value) -> Self {
        Self::spawn(status, body, None).await
    }

    /// Requests whose URI contains `marker` are answered after `delay`.
    pub async fn with_slow_marker(marker: &str, delay: Duration) -> Self {
        Self::spawn(
            StatusCode::OK,
            serde_json::json!({"status": "ok"}),
            Some((marker.to_string(), delay)),
        )
        .await
    }

    async fn spawn(status: StatusCode, body: Value, slow_marker: Option<(String, Duration)>) -> Self {
        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            body,
            slow_marker,
        };
        let app = Router::new().fallback(record).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock vendor");
        let addr = listener.local_addr().expect("mock vendor addr");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock vendor");
        });
        Self {
            base_url: format!("http://{}:{}", addr.ip(), addr.port()),
            state,
            task,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().expect("requests lock").len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("mock vendor received no request")
    }

    pub fn body(&self) -> &Value {
        &self.state.body
    }

    pub fn app(&self) -> App {
        app_for(&self.base_url)
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn app_for(base_url: &str) -> App {
    let config = LatentsenseConfig::new(TEST_API_KEY, TEST_PROJECT_ID, Some(base_url))
        .expect("test config");
    App::with_config(Logger::with_level("test", LogLevel::Error), config).expect("test app")
}

/// Fresh directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("latentsense-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn write_file(dir: &std::path::Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write temp file");
    path.to_string_lossy().into_owned()
}
