//! Identity and schema command tests.

mod common;

use common::TestHarness;
use common::member_row;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_me_prints_identity_and_caches_member() {
    let harness = TestHarness::new();
    harness
        .server
        .push_query_rows("Member", json!([member_row("Member:20", "Ada")]));

    harness
        .run(&["me"])
        .success()
        .stdout(predicate::str::contains("Logged in as: Ada"))
        .stdout(predicate::str::contains("Member:20"));

    let config = harness.read_config();
    assert!(config.contains("member_oid = \"Member:20\""));
    assert!(config.contains("member_name = \"Ada\""));
}

#[test]
fn test_me_queries_self_member() {
    let harness = TestHarness::new();
    harness
        .server
        .push_query_rows("Member", json!([member_row("Member:20", "Ada")]));

    harness.run(&["me"]).success();

    let bodies = harness.server.query_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["from"], "Member");
    assert_eq!(bodies[0]["where"]["IsSelf"], "true");
}

#[test]
fn test_me_json_output() {
    let harness = TestHarness::new();
    harness
        .server
        .push_query_rows("Member", json!([member_row("Member:20", "Ada")]));

    let output = harness.command().args(["me", "--json"]).output().expect("run v1");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(value["oid"], "Member:20");
    assert_eq!(value["name"], "Ada");
}

#[test]
fn test_me_with_no_member_fails() {
    let harness = TestHarness::new();
    harness.server.push_query_rows("Member", json!([]));

    harness
        .run(&["me"])
        .failure()
        .stderr(predicate::str::contains("Could not find current user"));
}

#[test]
fn test_auth_failure_exits_with_noperm() {
    let harness = TestHarness::new();
    harness.server.force_error(401, "bad token");

    harness
        .run(&["me"])
        .failure()
        .code(77)
        .stderr(predicate::str::contains("Authentication failed"))
        .stderr(predicate::str::contains("V1_TOKEN"));
}

#[test]
fn test_missing_url_is_a_config_error() {
    let harness = TestHarness::new();

    harness
        .command()
        .env_remove("V1_URL")
        .arg("me")
        .assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("V1_URL"));
}

#[test]
fn test_schema_lists_attributes() {
    let harness = TestHarness::new();
    harness
        .server
        .set_meta_attributes("Epic", &["Name", "Number", "Status", "Estimate"]);

    harness
        .run(&["schema", "Epic"])
        .success()
        .stdout(predicate::str::contains("Schema for Epic"))
        .stdout(predicate::str::contains("Estimate"))
        .stdout(predicate::str::contains("Total: 4 attributes"));
}

#[test]
fn test_schema_filter_is_case_insensitive() {
    let harness = TestHarness::new();
    harness
        .server
        .set_meta_attributes("Epic", &["Name", "Number", "Estimate"]);

    harness
        .run(&["schema", "Epic", "--filter", "ESTIMATE"])
        .success()
        .stdout(predicate::str::contains("Estimate"))
        .stdout(predicate::str::contains("Total: 1 attributes"));
}

#[test]
fn test_schema_unknown_asset_type_fails() {
    let harness = TestHarness::new();

    harness
        .run(&["schema", "Nonsense"])
        .failure()
        .stderr(predicate::str::contains("Failed to get schema"));
}

#[test]
fn test_completions_generate() {
    let harness = TestHarness::new();

    harness
        .run(&["completions", "bash"])
        .success()
        .stdout(predicate::str::contains("v1"));
}
