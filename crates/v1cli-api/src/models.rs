//! Domain models for VersionOne assets.

use serde::Deserialize;
use serde::Serialize;

use crate::query::AssetRow;

/// A VersionOne member (user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub oid: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A project: an Epic with Category "Business Epic".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub oid: String,
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub scope_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Project {
    pub(crate) fn from_row(row: &AssetRow) -> Result<Self, crate::ApiError> {
        Ok(Self {
            oid: row.oid()?,
            name: row.string_or_empty("Name"),
            number: row.string_or_empty("Number"),
            description: row.string_or_empty("Description"),
            category: row.str_field("Category.Name").map(str::to_string),
            scope_name: row.string_or_empty("Scope.Name"),
            parent_name: row.str_field("Super.Name").map(str::to_string),
            status: row.str_field("Status.Name").map(str::to_string),
        })
    }
}

/// A roadmap slot: an Epic with Category "Delivery Group".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryGroup {
    pub oid: String,
    pub number: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DeliveryGroup {
    pub(crate) fn from_row(row: &AssetRow) -> Result<Self, crate::ApiError> {
        Ok(Self {
            oid: row.oid()?,
            number: row.string_or_empty("Number"),
            name: row.string_or_empty("Name"),
            status: row.str_field("Status.Name").map(str::to_string),
            planned_start: row.str_field("PlannedStart").map(str::to_string),
            planned_end: row.str_field("PlannedEnd").map(str::to_string),
            category: row.str_field("Category.Name").map(str::to_string),
        })
    }
}

/// A feature: a child Epic under a Delivery Group or Business Epic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub oid: String,
    pub number: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub scope_name: String,
    #[serde(default)]
    pub scope_oid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_oid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Feature {
    pub(crate) fn from_row(row: &AssetRow) -> Result<Self, crate::ApiError> {
        Ok(Self {
            oid: row.oid()?,
            number: row.string_or_empty("Number"),
            name: row.string_or_empty("Name"),
            description: row.str_field("Description").map(str::to_string),
            scope_name: row.string_or_empty("Scope.Name"),
            scope_oid: row.relation_oid("Scope").unwrap_or_default(),
            parent_name: row.str_field("Super.Name").map(str::to_string),
            status: row.str_field("Status.Name").map(str::to_string),
            status_oid: row.relation_oid("Status"),
            category: row.str_field("Category.Name").map(str::to_string),
        })
    }
}

/// A story (second-level workitem).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub oid: String,
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_oid: Option<String>,
    #[serde(default)]
    pub scope_name: String,
    #[serde(default)]
    pub scope_oid: String,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub owner_oids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_oid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
}

impl Story {
    pub(crate) fn from_row(row: &AssetRow) -> Result<Self, crate::ApiError> {
        Ok(Self {
            oid: row.oid()?,
            number: row.string_or_empty("Number"),
            name: row.string_or_empty("Name"),
            description: row.string_or_empty("Description"),
            status: row.str_field("Status.Name").map(str::to_string),
            status_oid: row.relation_oid("Status"),
            scope_name: row.string_or_empty("Scope.Name"),
            scope_oid: row.relation_oid("Scope").unwrap_or_default(),
            owners: row.names_list("Owners.Name"),
            owner_oids: row.relation_oids("Owners"),
            parent_name: row.str_field("Super.Name").map(str::to_string),
            parent_oid: row.relation_oid("Super"),
            estimate: row.f64_field("Estimate"),
        })
    }

    /// Status for display, with fallback.
    pub fn status_display(&self) -> &str {
        self.status.as_deref().unwrap_or("None")
    }
}

/// A task (sub-item of a story).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub oid: String,
    #[serde(default)]
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub parent_oid: String,
    #[serde(default)]
    pub parent_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_oid: Option<String>,
    #[serde(default)]
    pub owners: Vec<String>,
    /// Hours remaining.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<f64>,
    /// Hours completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<f64>,
}

impl Task {
    pub(crate) fn from_row(row: &AssetRow) -> Result<Self, crate::ApiError> {
        Ok(Self {
            oid: row.oid()?,
            number: row.string_or_empty("Number"),
            name: row.string_or_empty("Name"),
            parent_oid: row.relation_oid("Parent").unwrap_or_default(),
            parent_number: row.string_or_empty("Parent.Number"),
            status: row.str_field("Status.Name").map(str::to_string),
            status_oid: row.relation_oid("Status"),
            owners: row.names_list("Owners.Name"),
            todo: row.f64_field("ToDo"),
            done: row.f64_field("Actuals"),
        })
    }

    pub fn is_done(&self) -> bool {
        matches!(
            self.status.as_deref().map(str::to_lowercase).as_deref(),
            Some("done") | Some("completed")
        )
    }
}

/// One selectable status option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub oid: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_story_from_row_full() {
        let row = AssetRow(json!({
            "_oid": "Story:1077",
            "Number": "S-1077",
            "Name": "Checkout retry flow",
            "Description": "Retry failed payments",
            "Status.Name": "In Progress",
            "Status": {"_oid": "StoryStatus:134"},
            "Scope.Name": "Payments",
            "Scope": {"_oid": "Scope:0"},
            "Owners.Name": ["Ada"],
            "Owners": [{"_oid": "Member:20"}],
            "Super.Name": "Checkout",
            "Super": {"_oid": "Epic:55"},
            "Estimate": 5.0,
        }));

        let story = Story::from_row(&row).unwrap();
        assert_eq!(story.oid, "Story:1077");
        assert_eq!(story.number, "S-1077");
        assert_eq!(story.status_oid.as_deref(), Some("StoryStatus:134"));
        assert_eq!(story.scope_oid, "Scope:0");
        assert_eq!(story.owners, vec!["Ada"]);
        assert_eq!(story.owner_oids, vec!["Member:20"]);
        assert_eq!(story.parent_oid.as_deref(), Some("Epic:55"));
        assert_eq!(story.estimate, Some(5.0));
        assert_eq!(story.status_display(), "In Progress");
    }

    #[test]
    fn test_story_from_row_sparse() {
        let row = AssetRow(json!({"_oid": "Story:9", "Name": "Bare"}));
        let story = Story::from_row(&row).unwrap();
        assert_eq!(story.number, "");
        assert!(story.status.is_none());
        assert!(story.owners.is_empty());
        assert_eq!(story.status_display(), "None");
    }

    #[test]
    fn test_story_from_row_missing_oid() {
        let row = AssetRow(json!({"Name": "No oid"}));
        assert!(Story::from_row(&row).is_err());
    }

    #[test]
    fn test_task_is_done() {
        let mut task = Task {
            oid: "Task:1".into(),
            number: "TK-1".into(),
            name: "Write tests".into(),
            parent_oid: "Story:1".into(),
            parent_number: "S-1".into(),
            status: Some("Done".into()),
            status_oid: None,
            owners: vec![],
            todo: Some(0.0),
            done: Some(3.0),
        };
        assert!(task.is_done());
        task.status = Some("Completed".into());
        assert!(task.is_done());
        task.status = Some("In Progress".into());
        assert!(!task.is_done());
        task.status = None;
        assert!(!task.is_done());
    }

    #[test]
    fn test_task_from_row_string_parent() {
        let row = AssetRow(json!({
            "_oid": "Task:7",
            "Name": "Deploy",
            "Parent": "Story:1077",
            "ToDo": 2,
        }));
        let task = Task::from_row(&row).unwrap();
        assert_eq!(task.parent_oid, "Story:1077");
        assert_eq!(task.todo, Some(2.0));
        assert!(task.done.is_none());
    }
}
