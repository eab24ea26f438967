//! Bootstrap sequence tests.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use maintenance_tracker::lifecycle::{Bootstrapper, FailedStep, Stage, StartupError};
use maintenance_tracker::store::{MemoryConnector, MemoryStore, PgConnector};

mod common;

fn write_config(dir: &Path, db_port: u16) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let www = dir.join("www");
    std::fs::create_dir_all(&www).unwrap();
    std::fs::write(
        &path,
        format!(
            r#"
[database]
host = "127.0.0.1"
port = {db_port}
dbname = "maintenance"
user = "tracker"
password = "secret"
connect_timeout_secs = 2

[server]
port = 8080
bind_address = "127.0.0.1"
assets_dirs = ["{www}"]
"#,
            db_port = db_port,
            www = www.display()
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
async fn test_missing_config_fails_first_step() {
    let dir = tempfile::tempdir().unwrap();
    let logger = common::file_logger(dir.path());
    let store = Arc::new(MemoryStore::new());

    let startup = Bootstrapper::new(dir.path().join("absent.toml"), MemoryConnector::new(store), logger)
        .bootstrap()
        .await;

    assert_eq!(startup.stage(), Stage::Failed(FailedStep::LoadConfig));
    assert!(!startup.outcome().config_loaded);
    assert!(!startup.outcome().is_runnable());
    assert!(matches!(startup.error(), Some(StartupError::Config(_))));

    let lines = common::log_lines(dir.path());
    assert!(lines.iter().any(|l| l.contains("[ERROR] Cannot open config file: ")));
    assert!(!lines.iter().any(|l| l.contains("Connecting to database")));
}

#[tokio::test]
async fn test_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[database]\nhost = \"x\"\n").unwrap();
    let logger = common::file_logger(dir.path());

    let startup = Bootstrapper::new(&path, MemoryConnector::unreachable(), logger)
        .bootstrap()
        .await;

    assert_eq!(startup.stage(), Stage::Failed(FailedStep::LoadConfig));
    let lines = common::log_lines(dir.path());
    assert!(lines.iter().any(|l| l.contains("[ERROR] Config error: ")));
}

#[tokio::test]
async fn test_unreachable_database_refuses_to_serve() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), 5432);
    let logger = common::file_logger(dir.path());

    let startup = Bootstrapper::new(&config, MemoryConnector::unreachable(), logger)
        .bootstrap()
        .await;

    assert_eq!(startup.stage(), Stage::Failed(FailedStep::ConnectDatabase));
    let outcome = startup.outcome();
    assert!(outcome.config_loaded);
    assert!(!outcome.db_connected);
    assert!(!outcome.routes_registered);
    assert_eq!(startup.port(), None);

    let err = startup.run().await.unwrap_err();
    assert!(matches!(err, StartupError::NotReady(FailedStep::ConnectDatabase)));

    let lines = common::log_lines(dir.path());
    assert!(lines.iter().any(|l| l.contains("[ERROR] Failed to connect to database: ")));
    assert!(lines.iter().any(|l| l.contains("Server not started")));
    assert!(!lines.iter().any(|l| l.contains("Routes configured")));
}

#[tokio::test]
async fn test_postgres_connection_refused() {
    let dir = tempfile::tempdir().unwrap();
    // Nothing listens on port 1.
    let config = write_config(dir.path(), 1);
    let logger = common::file_logger(dir.path());

    let started = Instant::now();
    let startup = Bootstrapper::new(&config, PgConnector, logger).bootstrap().await;

    // A single attempt: no waiting out the configured timeout.
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(startup.stage(), Stage::Failed(FailedStep::ConnectDatabase));
    match startup.error() {
        Some(StartupError::Connection(msg)) => assert!(msg.contains("refused"), "{}", msg),
        other => panic!("expected connection error, got {:?}", other),
    }

    let failure = common::log_lines(dir.path())
        .into_iter()
        .find(|l| l.contains("Failed to connect to database"))
        .unwrap();
    assert!(failure.contains("refused"), "{}", failure);
}

#[tokio::test]
async fn test_ready_startup_serves() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), 5432);
    let logger = common::file_logger(dir.path());
    let store = Arc::new(MemoryStore::new());

    let startup = Bootstrapper::new(&config, MemoryConnector::new(store), logger)
        .bootstrap()
        .await;
    assert_eq!(startup.stage(), Stage::Ready);
    assert!(startup.outcome().is_runnable());
    assert_eq!(startup.port(), Some(8080));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(startup.run_on(listener, async {
        let _ = rx.await;
    }));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .post(format!("http://{}/api/login", addr))
        .json(&serde_json::json!({ "username": "user", "password": "user123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["token"], "mock-jwt-token-user");

    drop(client);
    tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let lines = common::log_lines(dir.path());
    let order = [
        "Bootstrap started",
        "Config file loaded",
        "Connecting to database (host=127.0.0.1 port=5432 dbname=maintenance user=tracker)",
        "Connected to database successfully",
        "Server configured for port: 8080",
        "Routes configured successfully",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|needle| lines.iter().position(|l| l.contains(needle)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(lines.iter().any(|l| l.contains("ip=127.0.0.1")));
    assert!(!lines.iter().any(|l| l.contains("secret")));
}

#[tokio::test]
async fn test_logging_section_reconfigures_logger() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), 5432);
    let moved = dir.path().join("var").join("server.log");
    let mut text = std::fs::read_to_string(&config).unwrap();
    text.push_str(&format!(
        "\n[logging]\nfile = \"{}\"\nlevel = \"info\"\nconsole = false\n",
        moved.display()
    ));
    std::fs::write(&config, text).unwrap();

    let logger = common::file_logger(dir.path());
    let startup = Bootstrapper::new(&config, MemoryConnector::new(Arc::new(MemoryStore::new())), logger.clone())
        .bootstrap()
        .await;

    assert!(startup.is_ready());
    assert!(logger.file_enabled());
    assert!(!logger.console_enabled());
    assert_eq!(logger.file_path(), moved);

    let content = std::fs::read_to_string(&moved).unwrap();
    assert!(content.contains("Routes configured successfully"));
    // DEBUG stage transitions are filtered after the switch to INFO.
    assert!(!content.contains("[DEBUG]"));
}
