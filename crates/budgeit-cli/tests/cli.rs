//! CLI tests against a mock budge-it API.
//!
//! Each test runs the `budgeit` binary with an isolated data directory so the
//! remembered credentials never touch the real user store.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL: &str = "alice@example.com";

/// Run the CLI binary with an isolated data directory.
async fn run_cli(args: &[&str], data_dir: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_budgeit"));
    cmd.args(args);
    cmd.env("BUDGEIT_DATA_DIR", data_dir);
    cmd.env("BUDGEIT_API_URL", api_url);
    cmd.env_remove("BUDGEIT_API_KEY");
    cmd.env("NO_COLOR", "1");

    tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
        .await
        .unwrap()
}

async fn run_cli_success(args: &[&str], data_dir: &Path, api_url: &str) -> String {
    let output = run_cli(args, data_dir, api_url).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn login_body() -> Value {
    json!({
        "user": {
            "id": "u1",
            "firstName": "Alice",
            "lastName": "Ng",
            "email": EMAIL,
            "unallocated": 1234.5,
            "pockets": [],
            "tags": ["rent"]
        },
        "tokens": { "accessToken": "a1", "refreshToken": "r1" }
    })
}

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({ "email": EMAIL, "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pockets"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "p1", "name": "Rent", "amount": 1200.0 }
        ])))
        .mount(&server)
        .await;

    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_remember_and_replay() {
    let server = mock_api().await;
    let data = TempDir::new().unwrap();

    let stdout = run_cli_success(
        &["login", "--email", EMAIL, "--password", "hunter2", "--remember"],
        data.path(),
        &server.uri(),
    )
    .await;
    assert!(stdout.contains("Alice Ng"));

    let stdout = run_cli_success(&["whoami"], data.path(), &server.uri()).await;
    assert!(stdout.contains(EMAIL));
    assert!(stdout.contains("$1,234.50"));
    assert!(stdout.contains("127.0.0.1"));

    let stdout = run_cli_success(&["--json", "pockets", "list"], data.path(), &server.uri()).await;
    let pockets: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(pockets[0]["name"], "Rent");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_commands_require_remembered_credentials() {
    let server = mock_api().await;
    let data = TempDir::new().unwrap();

    run_cli_success(
        &["login", "--email", EMAIL, "--password", "hunter2"],
        data.path(),
        &server.uri(),
    )
    .await;

    let output = run_cli(&["pockets", "list"], data.path(), &server.uri()).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_remembered_credentials_ask_for_login() {
    let server = mock_api().await;
    let data = TempDir::new().unwrap();

    run_cli_success(
        &["login", "--email", EMAIL, "--password", "hunter2", "--remember"],
        data.path(),
        &server.uri(),
    )
    .await;

    let rotated = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .expect(1)
        .mount(&rotated)
        .await;

    let output = run_cli(&["whoami"], data.path(), &rotated.uri()).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Remembered credentials were rejected"));
    assert!(stderr.contains("budgeit login --remember"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_forgets_credentials() {
    let server = mock_api().await;
    let data = TempDir::new().unwrap();

    run_cli_success(
        &["login", "--email", EMAIL, "--password", "hunter2", "--remember"],
        data.path(),
        &server.uri(),
    )
    .await;
    run_cli_success(&["logout"], data.path(), &server.uri()).await;

    let output = run_cli(&["whoami"], data.path(), &server.uri()).await;
    assert!(!output.status.success());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_store_does_not_hold_plaintext_password() {
    let server = mock_api().await;
    let data = TempDir::new().unwrap();

    run_cli_success(
        &["login", "--email", EMAIL, "--password", "hunter2", "--remember"],
        data.path(),
        &server.uri(),
    )
    .await;

    for entry in std::fs::read_dir(data.path()).unwrap() {
        let contents = std::fs::read(entry.unwrap().path()).unwrap();
        assert!(!String::from_utf8_lossy(&contents).contains("hunter2"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_api_url_is_rejected() {
    let data = TempDir::new().unwrap();
    let output = run_cli(&["whoami"], data.path(), "http://api.budgeit.app").await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid API URL"));
}
