//! Layer built from a TOML file, writing to a real log file.

use std::fs;
use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use oink::config::load_config;
use oink::{HttpServer, OinkLayer};

async fn get(router: Router, uri: &str) -> StatusCode {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap().status()
}

fn router_from_toml(dir: &Path, middleware: &str) -> (Router, std::path::PathBuf) {
    let log_file = dir.join("log").join("oink.log");
    let config_path = dir.join("oink.toml");
    fs::write(
        &config_path,
        format!(
            "[middleware]\n{}\n\n[log]\nsink = \"file\"\nfile = '{}'\nprogram = \"web\"\n",
            middleware,
            log_file.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    let layer = OinkLayer::from_config(&config).unwrap();
    (HttpServer::build_router(layer), log_file)
}

fn log_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[tokio::test]
async fn test_from_config_writes_hodel_lines() {
    let dir = tempfile::tempdir().unwrap();
    let (router, log_file) = router_from_toml(
        dir.path(),
        "path = true\ninstruments = [\"memory\", \"activerecord\"]\n\
         counter_scope = \"request\"\nmemory_source = \"sysinfo\"",
    );

    assert_eq!(get(router, "/users/7").await, StatusCode::OK);

    let lines = log_lines(&log_file);
    assert_eq!(lines.len(), 5);
    let prefix = format!(" web[{}]: ", std::process::id());
    assert!(lines.iter().all(|line| line.contains(&prefix)));
    assert!(lines[0].ends_with("]: Oink Path: /users/7"));
    assert!(lines[1].ends_with("]: Oink Params: "));
    assert!(lines[2].contains("]: Memory usage: "));
    assert!(lines[3].ends_with("]: Instantiation Breakdown: Total: 1 | User: 1"));
    assert!(lines[4].ends_with("]: Oink Log Entry Complete"));
}

#[tokio::test]
async fn test_from_config_honours_instruments() {
    let dir = tempfile::tempdir().unwrap();
    let (router, log_file) = router_from_toml(
        dir.path(),
        "instruments = [\"activerecord\"]\ncounter_scope = \"request\"",
    );

    assert_eq!(get(router, "/legacy/posts/edit").await, StatusCode::OK);

    let lines = log_lines(&log_file);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("]: Oink Action: posts#edit"));
    assert!(lines.iter().all(|line| !line.contains("Memory usage")));
}

#[tokio::test]
async fn test_encoded_newline_in_path_stays_on_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let (router, log_file) = router_from_toml(dir.path(), "instruments = [\"memory\"]");

    let status = get(router, "/legacy/a%0AFAKE%20web%5B1%5D:%20Oink%20Action:%20evil/edit").await;
    assert_eq!(status, StatusCode::OK);

    let lines = log_lines(&log_file);
    assert_eq!(lines.len(), 4);
    let prefix = format!(" web[{}]: ", std::process::id());
    assert!(lines.iter().all(|line| line.contains(&prefix)));
    assert!(lines[0].ends_with("]: Oink Action: aFAKE web[1]: Oink Action: evil#edit"));
}
