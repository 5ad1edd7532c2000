//! Error surface tests: exit codes, suggestions, remote failures.

mod common;

use common::TestHarness;
use common::story_row;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_story_not_found_exits_unavailable() {
    let harness = TestHarness::new();
    harness.write_standard_config();
    harness.server.push_query_rows("Story", json!([]));

    harness
        .run(&["story", "S-404"])
        .failure()
        .code(69)
        .stderr(predicate::str::contains("Story not found: S-404"));
}

#[test]
fn test_status_requires_setup() {
    let harness = TestHarness::new();
    harness.write_config(
        r#"
member_oid = "Member:20"
"#,
    );

    harness
        .run(&["status", "S-1077", "done"])
        .failure()
        .code(64)
        .stderr(predicate::str::contains("Status mapping not configured."))
        .stderr(predicate::str::contains("v1 setup"));
}

#[test]
fn test_status_rejects_unknown_stage() {
    let harness = TestHarness::new();
    harness.write_standard_config();

    harness
        .run(&["status", "S-1077", "blocked"])
        .failure()
        .code(64)
        .stderr(predicate::str::contains("Invalid status: blocked"))
        .stderr(predicate::str::contains("backlog, ready, progress, review, done"));
}

#[test]
fn test_status_unmapped_stage_hints_setup() {
    let harness = TestHarness::new();
    harness.write_config(
        r#"
[status_mapping]
backlog = "StoryStatus:130"
"#,
    );

    harness
        .run(&["status", "S-1077", "review"])
        .failure()
        .code(64)
        .stderr(predicate::str::contains("Status not mapped: review"));
}

#[test]
fn test_server_error_is_marked_transient() {
    let harness = TestHarness::new();
    harness.write_standard_config();
    harness.server.force_error(503, "scheduled maintenance");

    harness
        .run(&["mine"])
        .failure()
        .code(74)
        .stderr(predicate::str::contains("API error (503)"))
        .stderr(predicate::str::contains("scheduled maintenance"))
        .stderr(predicate::str::contains("retry may succeed"));
}

#[test]
fn test_bad_request_surfaces_server_message() {
    let harness = TestHarness::new();
    harness.write_standard_config();
    harness.server.force_error(400, "Unknown attribute definition: Foo");

    harness
        .run(&["mine"])
        .failure()
        .code(64)
        .stderr(predicate::str::contains("Unknown attribute definition"))
        .stderr(predicate::str::contains("--auto-detect"));
}

#[test]
fn test_unreachable_server_suggests_checking_url() {
    let harness = TestHarness::new();

    harness
        .command()
        // Nothing listens on this port.
        .env("V1_URL", "http://127.0.0.1:9")
        .args(["mine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("V1_URL"));
}

#[test]
fn test_missing_token_reports_setup_steps() {
    let harness = TestHarness::new();

    harness
        .command()
        .env_remove("V1_TOKEN")
        .args(["me"])
        .assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("V1_TOKEN environment variable not set."));
}

#[test]
fn test_feature_parent_not_found_for_story_create() {
    let harness = TestHarness::new();
    harness.write_standard_config();
    harness.server.push_query_rows("Epic", json!([]));

    harness
        .run(&["story", "create", "New story", "-e", "E-404"])
        .failure()
        .code(69)
        .stderr(predicate::str::contains("Feature not found: E-404"));
}

#[test]
fn test_story_without_number_or_subcommand_is_usage_error() {
    let harness = TestHarness::new();
    harness.write_standard_config();

    harness
        .run(&["story"])
        .failure()
        .code(64)
        .stderr(predicate::str::contains("Story number required."));
}

#[test]
fn test_take_on_missing_story_reports_not_found() {
    let harness = TestHarness::new();
    harness.write_standard_config();
    harness.server.push_query_rows("Story", json!([]));

    harness
        .run(&["take", "S-404"])
        .failure()
        .code(69)
        .stderr(predicate::str::contains("Story not found"));
}

#[test]
fn test_update_failure_after_lookup_propagates() {
    let harness = TestHarness::new();
    harness.write_standard_config();
    harness.server.push_query_rows(
        "Story",
        json!([story_row("Story:1077", "S-1077", "Retry flow", "StoryStatus:134")]),
    );
    // The lookup succeeds; only the follow-up write fails.
    harness.server.force_asset_error(500, "write failed");

    harness
        .run(&["take", "S-1077"])
        .failure()
        .code(74)
        .stderr(predicate::str::contains("API error (500)"));
}
