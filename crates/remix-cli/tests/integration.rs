#![allow(deprecated)]
use assert_cmd::Command;
use mockito::{Matcher, ServerGuard};
use predicates::prelude::*;
use tempfile::TempDir;

const SECRET_VARS: [&str; 5] = [
    "AIRTABLE_TOKEN",
    "AIRTABLE_BASE_ID",
    "AIRTABLE_TABLE_ID",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
];

const ACTIONS_BODY: &str = r#"{"records":[
    {"id":"rec1","fields":{"Action Name":"泰坦尼克号船头","Visual Description":"站在船头张开双臂","Props":"围巾","Difficulty":"Low"}},
    {"id":"rec2","fields":{"Action Name":"无间道天台","Difficulty":"Medium"}},
    {"id":"rec3","fields":{"Action Name":"大话西游城楼","Difficulty":"Low"}}
]}"#;

const SCRIPT_BODY: &str = r####"{"id":"c1","model":"deepseek-chat","choices":[{"index":0,"message":{"role":"assistant","content":"### 🎬 剧名：催婚号"},"finish_reason":"stop"}]}"####;

/// `remix` with a clean environment rooted at `dir`.
fn remix(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("remix").unwrap();
    cmd.current_dir(dir.path())
        .env("REMIX_ROOT", dir.path())
        .env_remove("RUST_LOG");
    for key in SECRET_VARS {
        cmd.env_remove(key);
    }
    cmd
}

/// `remix` with every secret set.
fn remix_with_secrets(dir: &TempDir) -> Command {
    let mut cmd = remix(dir);
    cmd.env("AIRTABLE_TOKEN", "pat-test")
        .env("AIRTABLE_BASE_ID", "appBASE")
        .env("AIRTABLE_TABLE_ID", "tblACTIONS")
        .env("OPENAI_API_KEY", "sk-test");
    cmd
}

/// Point both upstream APIs at `server`.
fn write_config(dir: &TempDir, server: &ServerGuard, extra: &str) {
    let remix_dir = dir.path().join(".remix");
    std::fs::create_dir_all(&remix_dir).unwrap();
    let yaml = format!(
        "store:\n  api_url: {url}\n  timeout_secs: 5\ncompletion:\n  base_url: {url}\n  timeout_secs: 5\n{extra}",
        url = server.url()
    );
    std::fs::write(remix_dir.join("config.yaml"), yaml).unwrap();
}

fn mock_actions(server: &mut ServerGuard, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/appBASE/tblACTIONS")
        .match_header("authorization", "Bearer pat-test")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

// ---------------------------------------------------------------------------
// remix config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_defaults_once() {
    let dir = TempDir::new().unwrap();
    remix(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let content = std::fs::read_to_string(dir.path().join(".remix/config.yaml")).unwrap();
    assert!(content.contains("ttl_secs: 600"));
    assert!(content.contains("provider: deepseek"));

    remix(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn config_show_reports_defaults_and_missing_secrets() {
    let dir = TempDir::new().unwrap();
    let output = remix(&dir)
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["exists"], false);
    assert_eq!(json["config"]["prompt"]["variant"], "classic");
    assert_eq!(json["effective"]["model"], "deepseek-chat");
    assert_eq!(json["effective"]["base_url"], "https://api.deepseek.com");
    assert_eq!(json["secrets"]["AIRTABLE_TOKEN"], false);
}

#[test]
fn config_validate_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".remix")).unwrap();
    std::fs::write(
        dir.path().join(".remix/config.yaml"),
        "completion:\n  temperature: 4.0\n",
    )
    .unwrap();

    remix(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] completion.temperature"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_validate_passes_on_defaults() {
    let dir = TempDir::new().unwrap();
    remix(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

// ---------------------------------------------------------------------------
// Missing secrets
// ---------------------------------------------------------------------------

#[test]
fn generate_without_secrets_names_the_variable() {
    let dir = TempDir::new().unwrap();
    remix(&dir)
        .args(["generate", "--topic", "催婚"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AIRTABLE_TOKEN"));
}

#[test]
fn generate_without_completion_key_fails_before_fetching() {
    let mut server = mockito::Server::new();
    let store = server
        .mock("GET", "/appBASE/tblACTIONS")
        .match_query(Matcher::Any)
        .expect(0)
        .create();
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    remix_with_secrets(&dir)
        .env_remove("OPENAI_API_KEY")
        .args(["generate", "--topic", "催婚"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
    store.assert();
}

// ---------------------------------------------------------------------------
// remix actions
// ---------------------------------------------------------------------------

#[test]
fn actions_lists_the_table() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, ACTIONS_BODY);
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    remix_with_secrets(&dir)
        .env_remove("OPENAI_API_KEY")
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("泰坦尼克号船头"))
        .stdout(predicate::str::contains("无间道天台"))
        .stdout(predicate::str::contains("3 of 3 actions (tiers: Low, Medium)"));
}

#[test]
fn actions_json_filters_by_difficulty() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, ACTIONS_BODY);
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    let output = remix_with_secrets(&dir)
        .args(["actions", "--difficulty", "Low (低成本)", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["rec1", "rec3"]);
    assert_eq!(json[0]["props"], "围巾");
    assert_eq!(json[1]["props"], "无道具");
}

#[test]
fn store_error_is_reported() {
    let mut server = mockito::Server::new();
    let _store = server
        .mock("GET", "/appBASE/tblACTIONS")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"type":"AUTHENTICATION_REQUIRED","message":"Authentication required"}}"#)
        .create();
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    remix_with_secrets(&dir)
        .arg("actions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("record store request failed (401)"));
}

// ---------------------------------------------------------------------------
// remix prompt
// ---------------------------------------------------------------------------

#[test]
fn prompt_is_reproducible_with_seed_and_never_calls_the_model() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, ACTIONS_BODY);
    let chat = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create();
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    let run = || {
        remix_with_secrets(&dir)
            .args(["prompt", "--topic", "过年回家被催婚", "--style", "absurd", "--seed", "42"])
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    let stdout = String::from_utf8(first.stdout).unwrap();
    assert!(stdout.contains("- 话题/情绪: \"过年回家被催婚\""));
    assert!(stdout.contains("- 风格倾向: \"荒诞/黑色幽默\""));
    chat.assert();
}

#[test]
fn prompt_uses_visual_template_when_configured() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, ACTIONS_BODY);
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "prompt:\n  variant: visual\n");

    remix_with_secrets(&dir)
        .args(["prompt", "--topic", "考研", "--difficulty", "Medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Action:     无间道天台"))
        .stdout(predicate::str::contains("原始画面提示 (MJ Prompt): \"无画面提示\""));
}

#[test]
fn prompt_on_empty_table_fails() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, r#"{"records":[]}"#);
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    remix_with_secrets(&dir)
        .args(["prompt", "--topic", "催婚"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("the action store has no records"));
}

#[test]
fn prompt_rejects_unknown_style() {
    let dir = TempDir::new().unwrap();
    remix_with_secrets(&dir)
        .args(["prompt", "--topic", "催婚", "--style", "gothic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid style 'gothic'"));
}

#[test]
fn blank_topic_fails_before_fetching() {
    let mut server = mockito::Server::new();
    let store = server
        .mock("GET", "/appBASE/tblACTIONS")
        .match_query(Matcher::Any)
        .expect(0)
        .create();
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    remix_with_secrets(&dir)
        .args(["generate", "--topic", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("topic is required"));
    store.assert();
}

// ---------------------------------------------------------------------------
// remix generate
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_record_and_script() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, ACTIONS_BODY);
    let chat = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "deepseek-chat",
            "temperature": 0.9
        })))
        .with_status(200)
        .with_body(SCRIPT_BODY)
        .expect(1)
        .create();
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    remix_with_secrets(&dir)
        .args(["generate", "--topic", "过年回家被催婚", "--difficulty", "Medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Action:     无间道天台"))
        .stdout(predicate::str::contains("### 🎬 剧名：催婚号"));
    chat.assert();
}

#[test]
fn generate_json_includes_id_and_outcome() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, ACTIONS_BODY);
    let _chat = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(SCRIPT_BODY)
        .create();
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    let output = remix_with_secrets(&dir)
        .args(["generate", "--topic", "催婚", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["id"].as_str().is_some());
    assert_eq!(json["script"]["status"], "written");
    assert_eq!(json["script"]["text"], "### 🎬 剧名：催婚号");
}

#[test]
fn completion_failure_shows_record_and_exits_nonzero() {
    let mut server = mockito::Server::new();
    let _store = mock_actions(&mut server, ACTIONS_BODY);
    let _chat = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body(r#"{"error":{"message":"upstream overloaded"}}"#)
        .create();
    let dir = TempDir::new().unwrap();
    write_config(&dir, &server, "");

    remix_with_secrets(&dir)
        .args(["generate", "--topic", "催婚", "--difficulty", "Medium"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("无间道天台"))
        .stderr(predicate::str::contains("script generation failed"))
        .stderr(predicate::str::contains("upstream overloaded"));
}
