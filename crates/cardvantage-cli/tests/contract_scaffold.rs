use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const EXPECTED_ROOT_HELP: &str = "CardVantage - the best card for the site you are on

Usage:
  cardvantage <command>

Start here:
  cardvantage card add \"Chase Sapphire Reserve\"
  cardvantage recommend https://www.doordash.com/
";

static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

fn unique_test_home() -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(value) => value.as_nanos(),
        Err(_) => 0,
    };
    let sequence = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "cardvantage-cli-test-{}-{stamp}-{sequence}",
        std::process::id()
    ));
    path
}

fn cli_command(home: &Path, args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cardvantage"));
    command.args(args);
    command.env("CARDVANTAGE_HOME", home);
    command.env("CARDVANTAGE_CLASSIFIER_URL", "off");
    command.env_remove("RUST_LOG");
    command
}

/// Returns (exit code, stdout).
fn run_cli_in_home(home: &Path, args: &[&str]) -> (i32, String) {
    let mut command = cli_command(home, args);
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let output = command.output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        let stdout = String::from_utf8(result.stdout);
        assert!(stdout.is_ok());
        if let Ok(stdout_text) = stdout {
            return (result.status.code().unwrap_or(-1), stdout_text);
        }
    }

    (-1, String::new())
}

fn run_cli(args: &[&str]) -> (i32, String, PathBuf) {
    let home = unique_test_home();
    let (code, body) = run_cli_in_home(&home, args);
    (code, body, home)
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok());
    if let Ok(value) = parsed {
        return value;
    }
    Value::Null
}

fn add_card_json(home: &Path, name: &str, extra: &[&str]) -> Value {
    let mut args = vec!["card", "add", name];
    args.extend_from_slice(extra);
    args.push("--json");
    let (code, body) = run_cli_in_home(home, &args);
    assert_eq!(code, 0, "{body}");
    parse_json(&body)
}

fn assert_pipe_close_does_not_panic(args: &[&str], expect_success: bool) {
    let home = unique_test_home();
    let mut producer = cli_command(&home, args);
    producer.stdout(Stdio::piped());
    producer.stderr(Stdio::piped());

    let producer_spawn = producer.spawn();
    assert!(producer_spawn.is_ok());
    if let Ok(mut producer_child) = producer_spawn {
        let producer_stdout = producer_child.stdout.take();
        let producer_stderr = producer_child.stderr.take();
        assert!(producer_stdout.is_some());
        assert!(producer_stderr.is_some());

        if let Some(stdout_pipe) = producer_stdout {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            let read_result = reader.read_line(&mut first_line);
            assert!(read_result.is_ok());
            assert!(!first_line.is_empty());
            drop(reader);
        }

        let status = producer_child.wait();
        assert!(status.is_ok());
        if let Ok(exit_status) = status {
            assert_eq!(exit_status.success(), expect_success);
        }

        if let Some(mut stderr_pipe) = producer_stderr {
            let mut stderr_bytes = Vec::new();
            let stderr_read = stderr_pipe.read_to_end(&mut stderr_bytes);
            assert!(stderr_read.is_ok());
            let stderr = String::from_utf8(stderr_bytes);
            assert!(stderr.is_ok());
            if let Ok(stderr_text) = stderr {
                assert!(!stderr_text.contains("Broken pipe"));
                assert!(!stderr_text.contains("panicked"));
            }
        }
    }
}

fn assert_text_error_contract(body: &str, code: &str) {
    assert!(body.contains("That request could not be completed."));
    assert!(body.contains(&format!("  Error:    {code}")));
    assert!(body.contains("  Details:"));
    assert!(body.contains("Next steps:"));
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

#[test]
fn root_command_uses_short_plaintext_help() {
    let (code, body, _) = run_cli(&[]);
    assert_eq!(code, 0);
    assert_eq!(body, EXPECTED_ROOT_HELP);
}

#[test]
fn help_and_version_return_success_output() {
    let (help_code, help_body, _) = run_cli(&["--help"]);
    assert_eq!(help_code, 0);
    assert!(help_body.starts_with("CardVantage - the best card for the site you are on"));
    assert!(help_body.contains("cardvantage card add <name>"));
    assert!(help_body.contains("cardvantage recommend <url>"));
    assert!(help_body.contains("CARDVANTAGE_CLASSIFIER_URL=off"));

    let (version_code, version_body, _) = run_cli(&["--version"]);
    assert_eq!(version_code, 0);
    assert_eq!(version_body.trim(), "cardvantage 0.1.0");
}

#[test]
fn card_add_help_explains_reward_flags() {
    let (code, body, _) = run_cli(&["card", "add", "--help"]);
    assert_eq!(code, 0);
    assert!(body.contains("--category-rate"));
    assert!(body.contains("built-in catalog"));
}

#[test]
fn bare_card_shows_help_with_subcommands() {
    let (code, body, _) = run_cli(&["card"]);
    assert_eq!(code, 0);
    assert!(body.contains("List saved cards"));
    assert!(body.contains("Save a card"));
    assert!(body.contains("Delete a saved card by id"));
}

#[test]
fn help_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["card", "add", "--help"], true);
}

#[test]
fn success_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["card", "list"], true);
}

#[test]
fn error_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["card", "add", "--nope"], false);
}

#[test]
fn empty_card_list_plaintext_and_json_contracts_are_supported() {
    let home = unique_test_home();

    let (text_code, text_body) = run_cli_in_home(&home, &["card", "list"]);
    assert_eq!(text_code, 0);
    assert!(text_body.starts_with("No cards saved yet."));
    assert!(text_body.contains("cardvantage card add"));

    let (json_code, json_body) = run_cli_in_home(&home, &["card", "list", "--json"]);
    assert_eq!(json_code, 0);
    let payload = parse_json(&json_body);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["version"], Value::String("v1".to_string()));
    assert!(payload.get("command").is_none());
    assert_eq!(payload["data"]["cards"], Value::Array(Vec::new()));
    assert!(home.join("profile.db").exists());
}

#[test]
fn card_add_list_and_delete_round_trip() {
    let home = unique_test_home();

    let (add_code, add_body) = run_cli_in_home(&home, &["card", "add", "Amex Gold"]);
    assert_eq!(add_code, 0);
    assert!(add_body.starts_with("Card saved."));
    assert!(add_body.contains("Amex Gold"));
    assert!(add_body.contains("catalog"));

    let added = add_card_json(&home, "Custom Visa", &["--base-rate", "1.5", "--category-rate", "Gas=3"]);
    let card_id = added["data"]["card"]["id"].as_str().unwrap_or("").to_string();
    assert!(card_id.starts_with("card_"));
    assert_eq!(added["data"]["card_count"], Value::from(2));
    assert_eq!(added["data"]["card"]["rewardProfile"]["baseRate"], Value::from(1.5));
    assert_eq!(
        added["data"]["card"]["rewardProfile"]["categoryRates"]["Gas"],
        Value::from(3.0)
    );

    let (list_code, list_body) = run_cli_in_home(&home, &["card", "list"]);
    assert_eq!(list_code, 0);
    assert!(list_body.starts_with("Saved cards (2 cards):"));
    assert!(list_body.contains("Gas 3.0x, base 1.5x"));

    let (delete_code, delete_body) =
        run_cli_in_home(&home, &["card", "delete", &card_id, "--json"]);
    assert_eq!(delete_code, 0);
    let deleted = parse_json(&delete_body);
    assert_eq!(deleted["data"]["card"]["name"], Value::String("Custom Visa".to_string()));
    assert_eq!(deleted["data"]["card_count"], Value::from(1));

    let (_, list_json) = run_cli_in_home(&home, &["card", "list", "--json"]);
    let listed = parse_json(&list_json);
    assert!(matches!(listed["data"]["cards"].as_array(), Some(cards) if cards.len() == 1));
}

#[test]
fn card_names_with_separator_are_rejected() {
    let (code, body, _) = run_cli(&["card", "add", "Amex|Gold", "--json"]);
    assert_eq!(code, 1);
    assert_json_error_contract(&body, "card_name_invalid");
}

#[test]
fn deleting_unknown_card_is_a_user_error() {
    let (code, body, _) = run_cli(&["card", "delete", "card_missing"]);
    assert_eq!(code, 1);
    assert_text_error_contract(&body, "card_not_found");
}

#[test]
fn malformed_category_rate_is_rejected() {
    let (code, body, _) = run_cli(&["card", "add", "Custom", "--category-rate", "Gas", "--json"]);
    assert_eq!(code, 1);
    assert_json_error_contract(&body, "reward_profile_invalid");
}

#[test]
fn invalid_base_rate_names_the_command_in_recovery_steps() {
    let (code, body, _) = run_cli(&["card", "add", "Custom", "--base-rate", "lots", "--json"]);
    assert_eq!(code, 1);
    let payload = assert_json_error_contract(&body, "invalid_argument");
    assert_eq!(
        payload["error"]["recovery_steps"][0],
        Value::String("Run `cardvantage card add --help` for usage.".to_string())
    );
    assert!(
        !payload["error"]["message"]
            .as_str()
            .unwrap_or("")
            .contains("Usage:")
    );
}

#[test]
fn unquoted_card_name_gets_quoting_advice() {
    let (code, body, _) = run_cli(&["card", "add", "Chase", "Sapphire"]);
    assert_eq!(code, 1);
    assert_text_error_contract(&body, "invalid_argument");
    assert!(body.contains("Quote the name"));
}

#[test]
fn recommend_without_cards_is_a_no_result_error() {
    let (text_code, text_body, _) = run_cli(&["recommend", "www.doordash.com"]);
    assert_eq!(text_code, 1);
    assert_text_error_contract(&text_body, "no_cards_available");
    assert!(text_body.contains("cardvantage card add"));

    let (json_code, json_body, _) = run_cli(&["recommend", "www.doordash.com", "--json"]);
    assert_eq!(json_code, 1);
    assert_json_error_contract(&json_body, "no_cards_available");
}

#[test]
fn recommend_uses_local_fallback_when_classifier_is_off() {
    let home = unique_test_home();
    add_card_json(&home, "Chase Sapphire Reserve", &[]);
    add_card_json(&home, "Citi Double Cash", &[]);

    let (text_code, text_body) =
        run_cli_in_home(&home, &["recommend", "https://www.doordash.com/store/123"]);
    assert_eq!(text_code, 0, "{text_body}");
    assert!(text_body.starts_with("Best card for this site:"));
    assert!(text_body.contains("Site:      www.doordash.com"));
    assert!(text_body.contains("Category:  Dining"));
    assert!(text_body.contains("local rules"));
    assert!(text_body.contains("  1. Chase Sapphire Reserve (3.0x)"));

    let (json_code, json_body) = run_cli_in_home(
        &home,
        &["recommend", "www.doordash.com", "--title", "DoorDash", "--json"],
    );
    assert_eq!(json_code, 0);
    let payload = parse_json(&json_body);
    assert_eq!(payload["data"]["source"], Value::String("fallback".to_string()));
    assert_eq!(payload["data"]["site"]["title"], Value::String("DoorDash".to_string()));
    assert_eq!(
        payload["data"]["fingerprint"],
        Value::String("www.doordash.com|Chase Sapphire Reserve|Citi Double Cash".to_string())
    );
    assert_eq!(
        payload["data"]["result"]["recommendations"][0]["rewardRate"],
        Value::String("3.0x".to_string())
    );

    // Fallback answers are never cached.
    let (cache_code, cache_body) = run_cli_in_home(&home, &["cache", "list"]);
    assert_eq!(cache_code, 0);
    assert!(cache_body.starts_with("No cached recommendations."));
}

#[test]
fn recommend_with_unreadable_url_reports_missing_domain() {
    let home = unique_test_home();
    add_card_json(&home, "Amex Gold", &[]);

    let (code, body) = run_cli_in_home(&home, &["recommend", "https://", "--json"]);
    assert_eq!(code, 1);
    let payload = assert_json_error_contract(&body, "missing_domain");
    assert!(
        payload["error"]["message"]
            .as_str()
            .unwrap_or("")
            .contains("https://")
    );
}

#[test]
fn cache_list_json_contract_is_supported() {
    let (code, body, _) = run_cli(&["cache", "list", "--json"]);
    assert_eq!(code, 0);
    let payload = parse_json(&body);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["data"]["entries"], Value::Array(Vec::new()));
}

#[test]
fn unknown_subcommand_uses_plaintext_error_contract() {
    let (code, body, _) = run_cli(&["login"]);
    assert_eq!(code, 1);
    assert_text_error_contract(&body, "invalid_argument");
}
