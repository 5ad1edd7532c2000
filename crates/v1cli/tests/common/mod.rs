//! Shared test harness: a mock V1 server plus an isolated config dir,
//! with the binary pointed at both.

#![allow(dead_code)]

pub mod mock_v1;

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

pub use mock_v1::MockV1Server;

pub struct TestHarness {
    pub server: MockV1Server,
    pub config_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            server: MockV1Server::start(),
            config_dir: TempDir::new().expect("temp config dir"),
        }
    }

    /// Runs the binary against the mock server and returns the assertion.
    pub fn run(&self, args: &[&str]) -> Assert {
        self.command().args(args).assert()
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("v1").expect("v1 binary");
        cmd.env("V1_URL", self.server.url())
            .env("V1_TOKEN", "test-token")
            .env("V1CLI_CONFIG_DIR", self.config_dir.path())
            .env("NO_COLOR", "1")
            .env_remove("V1_VERIFY_SSL")
            .env_remove("V1CLI_LOG")
            .env_remove("V1CLI_LOG_FILE");
        cmd
    }

    /// Writes a config.toml directly, bypassing the interactive setup.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_dir.path().join("config.toml"), contents)
            .expect("write config");
    }

    pub fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_dir.path().join("config.toml")).unwrap_or_default()
    }

    /// A config with a cached member, one bookmarked default project and a
    /// fully mapped status workflow.
    pub fn write_standard_config(&self) {
        self.write_config(
            r#"
member_oid = "Member:20"
member_name = "Ada"
default_project = "Epic:1000"

[status_mapping]
backlog = "StoryStatus:130"
ready = "StoryStatus:131"
in_progress = "StoryStatus:134"
review = "StoryStatus:135"
done = "StoryStatus:137"

[[bookmarks]]
name = "Checkout Revamp"
oid = "Epic:1000"
"#,
        );
    }
}

// Canned rows

pub fn story_row(oid: &str, number: &str, name: &str, status_oid: &str) -> Value {
    json!({
        "_oid": oid,
        "Number": number,
        "Name": name,
        "Description": "",
        "Status.Name": "In Progress",
        "Status": {"_oid": status_oid},
        "Scope.Name": "Checkout Revamp",
        "Scope": {"_oid": "Epic:1000"},
        "Owners.Name": ["Ada"],
        "Owners": [{"_oid": "Member:20"}],
        "Super.Name": "Checkout",
        "Super": {"_oid": "Epic:55"},
        "Estimate": 3.0,
    })
}

pub fn member_row(oid: &str, name: &str) -> Value {
    json!({
        "_oid": oid,
        "Name": name,
        "Email": "ada@example.com",
        "Username": "ada",
    })
}

pub fn epic_row(oid: &str, number: &str, name: &str, category: &str) -> Value {
    json!({
        "_oid": oid,
        "Number": number,
        "Name": name,
        "Description": "",
        "Category.Name": category,
        "Scope.Name": "Enterprise",
        "Scope": {"_oid": "Scope:0"},
        "Super.Name": null,
        "Status.Name": "Implementation",
        "Status": {"_oid": "EpicStatus:201"},
    })
}

pub fn task_row(oid: &str, number: &str, name: &str, todo: f64, done: f64) -> Value {
    json!({
        "_oid": oid,
        "Number": number,
        "Name": name,
        "Parent": {"_oid": "Story:1077"},
        "Parent.Number": "S-1077",
        "Status.Name": if todo == 0.0 { "Done" } else { "In Progress" },
        "Status": {"_oid": "TaskStatus:301"},
        "Owners.Name": ["Ada"],
        "ToDo": todo,
        "Actuals": done,
    })
}

pub fn status_row(oid: &str, name: &str) -> Value {
    json!({ "_oid": oid, "Name": name })
}
