//! Integration tests for the `cececo` CLI binary.
//!
//! Parsing, help and completions run without a hub. The listing tests
//! point `--api-base` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `cececo` binary with env isolation.
///
/// Clears all `CECECO_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn cececo_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cececo");
    cmd.env("HOME", "/tmp/cececo-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/cececo-cli-test-nonexistent")
        .env_remove("CECECO_API_BASE")
        .env_remove("CECECO_TIMEOUT")
        .env_remove("CECECO_MATCH_LIMIT")
        .env_remove("CECECO_PREVIEW")
        .env_remove("CECECO_OUTPUT")
        .env_remove("CECECO_COLOR")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || cececo_cmd().args(&args).output().unwrap())
        .await
        .unwrap()
}

fn args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut v = vec!["--api-base".to_owned(), server.uri()];
    v.extend(rest.iter().map(|s| (*s).to_owned()));
    v
}

async fn mount_countries(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "name": "Ghana", "iso2": "GH", "region": "West Africa" },
            { "id": 7, "name": "Kenya", "iso2": "KE", "region": "East Africa" }
        ])))
        .mount(server)
        .await;
}

fn scored(investor_id: u32, name: &str, score: f64) -> Value {
    json!({
        "investor": { "id": investor_id, "name": name, "investor_type": "fund" },
        "score": score,
        "score_100": score,
        "reasons": ["Sector match"]
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = cececo_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    cececo_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("CECECO")
            .and(predicate::str::contains("investors"))
            .and(predicate::str::contains("startups"))
            .and(predicate::str::contains("news")),
    );
}

#[test]
fn test_version_flag() {
    cececo_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cececo"));
}

#[test]
fn test_projects_subcommands_exist() {
    cececo_cmd()
        .args(["projects", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("matches"))
                .and(predicate::str::contains("create")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    cececo_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    cececo_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    cececo_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8000"));
}

#[test]
fn test_config_show_applies_flag_override() {
    cececo_cmd()
        .args(["--api-base", "https://hub.example.org", "-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_base\": \"https://hub.example.org\""));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = cececo_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_investor_type_rejected_by_parser() {
    let output = cececo_cmd()
        .args(["investors", "list", "--type", "bank"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_non_numeric_country_is_usage_error() {
    // Validation happens before any request is sent.
    cececo_cmd()
        .args(["--api-base", "http://127.0.0.1:1", "investors", "list", "-c", "kenya"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("country"));
}

#[test]
fn test_invalid_api_base_is_usage_error() {
    cececo_cmd()
        .args(["--api-base", "not a url", "countries"])
        .assert()
        .code(2);
}

#[test]
fn test_unreachable_hub_exit_code() {
    cececo_cmd()
        .args(["--api-base", "http://127.0.0.1:1", "--timeout", "5", "countries"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not reach the hub"));
}

// ── Against a mock hub ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_countries_json() {
    let server = MockServer::start().await;
    mount_countries(&server).await;

    let output = run(args(&server, &["-o", "json", "countries"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body[1]["name"], "Kenya");
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_investors_link_and_flags_merge() {
    let server = MockServer::start().await;
    mount_countries(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/investors"))
        .and(query_param("q", "solar"))
        .and(query_param("country_id", "7"))
        .and(query_param("investor_type", "fund"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Sahel Solar Fund", "investor_type": "fund",
              "focus_sectors": "Solar, Storage", "stages": "seed" },
            { "id": 2, "name": "Rift Wind Partners", "investor_type": "fund",
              "focus_sectors": "Wind", "stages": "growth" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &[
            "--link", "?q=solar&utm=mail", "--print-link", "-o", "plain",
            "investors", "list", "-c", "7", "-t", "fund", "--sector", "storage",
        ],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("?utm=mail&q=solar&investor_type=fund&country_id=7"),
        "unexpected link: {stderr}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_startups_list_sends_kind() {
    let server = MockServer::start().await;
    mount_countries(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("kind", "startup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 11, "kind": "startup", "country_id": 3, "title": "Volta Mini-grids",
              "summary": "Solar mini-grids", "sector": "Solar", "stage": "seed" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(&server, &["startups", "list", "--color", "never"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Volta Mini-grids"));
    assert!(stdout.contains("Ghana"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_project_matches_preview_and_all() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/4/matches"))
        .and(query_param("strict_country", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            scored(1, "Investor A", 90.0),
            scored(2, "Investor B", 80.0),
            scored(3, "Investor C", 70.0),
            scored(4, "Investor D", 60.0),
            scored(5, "Investor E", 50.0)
        ])))
        .mount(&server)
        .await;

    let preview = run(args(
        &server,
        &["--color", "never", "projects", "matches", "4", "--strict"],
    ))
    .await;
    assert!(preview.status.success(), "{}", combined_output(&preview));
    let stdout = String::from_utf8_lossy(&preview.stdout);
    assert!(stdout.contains("Showing 3 of 5"), "{stdout}");
    assert!(stdout.contains("Investor C"));
    assert!(!stdout.contains("Investor D"));

    let all = run(args(&server, &["-o", "plain", "projects", "matches", "4", "--strict", "-a"])).await;
    assert!(all.status.success());
    assert_eq!(String::from_utf8_lossy(&all.stdout).trim(), "1\n2\n3\n4\n5");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_project_matches_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/99/matches"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Project not found"))
        .mount(&server)
        .await;

    let output = run(args(&server, &["projects", "matches", "99"])).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("projects list"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_with_matches_isolates_panel_errors() {
    let server = MockServer::start().await;
    mount_countries(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "kind": "project", "country_id": 7, "title": "Lake Turkana Wind",
              "summary": "Wind farm", "sector": "Wind" },
            { "id": 2, "kind": "project", "country_id": 3, "title": "Accra Rooftops",
              "summary": "Rooftop solar", "sector": "Solar" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/1/matches"))
        .respond_with(ResponseTemplate::new(500).set_body_string("scoring service down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/2/matches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([scored(9, "Gold Coast Angels", 75.0)])))
        .mount(&server)
        .await;

    let output = run(args(&server, &["-o", "json", "projects", "list", "--matches"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body[0]["project"]["id"], 1);
    assert_eq!(body[0]["error"], "scoring service down");
    assert_eq!(body[1]["total"], 1);
    assert_eq!(body[1]["matches"][0]["investor"]["name"], "Gold Coast Angels");
    assert!(body[1].get("error").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_error_message_surfaces() {
    let server = MockServer::start().await;
    mount_countries(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/news"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let output = run(args(&server, &["news"])).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("database unavailable"));
}
