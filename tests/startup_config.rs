mod common;

use common::ENV_LOCK;
use latentsense::app::App;
use latentsense::mcp::server::run_stdio;

const VARS: &[&str] = &[
    "LATENTSENSE_API_KEY",
    "LATENTSENSE_PROJECT_ID",
    "LATENTSENSE_BASE_URL",
    "LATENTSENSE_TIMEOUT_MS",
];

fn set_env(pairs: &[(&str, &str)]) {
    for var in VARS {
        std::env::remove_var(var);
    }
    for (key, value) in pairs {
        std::env::set_var(key, value);
    }
}

#[tokio::test]
async fn missing_api_key_stops_startup() {
    let _guard = ENV_LOCK.lock().await;
    set_env(&[("LATENTSENSE_PROJECT_ID", "proj-1")]);

    let err = App::initialize().err().expect("startup must fail");
    assert_eq!(err.code, "CONFIG_MISSING");
    assert!(err.message.contains("LATENTSENSE_API_KEY"));

    let err = run_stdio().await.expect_err("server must not start");
    assert_eq!(err.code, "CONFIG_MISSING");
    set_env(&[]);
}

#[tokio::test]
async fn missing_project_id_stops_startup() {
    let _guard = ENV_LOCK.lock().await;
    set_env(&[("LATENTSENSE_API_KEY", "key"), ("LATENTSENSE_PROJECT_ID", "  ")]);

    let err = App::initialize().err().expect("startup must fail");
    assert_eq!(err.code, "CONFIG_MISSING");
    assert!(err.message.contains("LATENTSENSE_PROJECT_ID"));
    set_env(&[]);
}

#[tokio::test]
async fn invalid_base_url_is_rejected() {
    let _guard = ENV_LOCK.lock().await;
    set_env(&[
        ("LATENTSENSE_API_KEY", "key"),
        ("LATENTSENSE_PROJECT_ID", "proj-1"),
        ("LATENTSENSE_BASE_URL", "ftp://controller.example"),
    ]);

    let err = App::initialize().err().expect("startup must fail");
    assert_eq!(err.code, "CONFIG_INVALID");
    set_env(&[]);
}

#[tokio::test]
async fn complete_environment_builds_the_app() {
    let _guard = ENV_LOCK.lock().await;
    set_env(&[
        ("LATENTSENSE_API_KEY", "key"),
        ("LATENTSENSE_PROJECT_ID", "proj-1"),
        ("LATENTSENSE_BASE_URL", "http://127.0.0.1:9/"),
        ("LATENTSENSE_TIMEOUT_MS", "1500"),
    ]);

    let app = App::initialize().expect("app builds");
    let config = app.client.config();
    assert_eq!(config.project_id(), "proj-1");
    assert_eq!(config.base_url(), "http://127.0.0.1:9");
    assert_eq!(config.timeout(), std::time::Duration::from_millis(1500));
    assert_eq!(app.tool_executor.tool_names().len(), 8);
    set_env(&[]);
}
