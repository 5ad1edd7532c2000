//! Safe default query configurations.
//!
//! Only fields that exist on every V1 instance are listed here. Instance
//! extras (Type, PercentDone, Estimate on Epic) come in through schema
//! auto-detection instead.

use crate::settings::AssetQueryConfig;
use crate::settings::ColumnConfig;
use crate::settings::ColumnFormat;
use crate::settings::Justify;
use crate::settings::ProjectQueryConfig;

pub const DELIVERY_GROUP_SELECT: &[&str] =
    &["Name", "Number", "Status.Name", "PlannedStart", "PlannedEnd"];

pub const DELIVERY_GROUP_FILTERS: &[&str] = &["Category.Name='Delivery Group'"];

pub const FEATURE_SELECT: &[&str] = &[
    "Number",
    "Name",
    "Description",
    "Status.Name",
    "Status",
    "Scope.Name",
    "Scope",
    "Super.Name",
];

pub const FEATURE_FILTERS: &[&str] = &["Category.Name!='Delivery Group'"];

pub const STORY_SELECT: &[&str] = &[
    "Number",
    "Name",
    "Description",
    "Status.Name",
    "Status",
    "Scope.Name",
    "Scope",
    "Owners.Name",
    "Owners",
    "Super.Name",
    "Super",
    "Estimate",
];

pub const TASK_SELECT: &[&str] = &[
    "Number",
    "Name",
    "Parent",
    "Parent.Number",
    "Status.Name",
    "Status",
    "Owners.Name",
    "ToDo",
    "Actuals",
];

fn strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

pub fn default_delivery_group_config() -> AssetQueryConfig {
    AssetQueryConfig {
        select: strings(DELIVERY_GROUP_SELECT),
        filters: strings(DELIVERY_GROUP_FILTERS),
        sort: strings(&["PlannedStart", "Name"]),
        columns: vec![
            ColumnConfig::new("Number").label("Number").style("cyan"),
            ColumnConfig::new("Name").label("Name").max_width(40),
            ColumnConfig::new("Status.Name").label("Status"),
            ColumnConfig::new("PlannedStart")
                .label("Start")
                .format(ColumnFormat::Date),
            ColumnConfig::new("PlannedEnd")
                .label("End")
                .format(ColumnFormat::Date),
        ],
    }
}

pub fn default_feature_config() -> AssetQueryConfig {
    AssetQueryConfig {
        select: strings(FEATURE_SELECT),
        filters: strings(FEATURE_FILTERS),
        sort: strings(&["-ChangeDateUTC"]),
        columns: vec![
            ColumnConfig::new("Number").label("Number").style("cyan"),
            ColumnConfig::new("Name").label("Name").max_width(50),
            ColumnConfig::new("Status.Name").label("Status"),
            ColumnConfig::new("Scope.Name").label("Project").style("dim"),
        ],
    }
}

pub fn default_story_config() -> AssetQueryConfig {
    AssetQueryConfig {
        select: strings(STORY_SELECT),
        filters: vec![],
        sort: strings(&["-ChangeDateUTC"]),
        columns: vec![
            ColumnConfig::new("Number").label("Number").style("cyan"),
            ColumnConfig::new("Status.Name").label("Status"),
            ColumnConfig::new("Name").label("Name").max_width(40),
            ColumnConfig::new("Estimate")
                .label("Pts")
                .justify(Justify::Right)
                .format(ColumnFormat::Points),
            ColumnConfig::new("Scope.Name").label("Project").style("dim"),
        ],
    }
}

pub fn default_task_config() -> AssetQueryConfig {
    AssetQueryConfig {
        select: strings(TASK_SELECT),
        filters: vec![],
        sort: strings(&["Order"]),
        columns: vec![
            ColumnConfig::new("Number").label("Number").style("cyan"),
            ColumnConfig::new("Name").label("Name").max_width(40),
            ColumnConfig::new("Status.Name").label("Status"),
            ColumnConfig::new("Actuals")
                .label("Done")
                .justify(Justify::Right)
                .format(ColumnFormat::Hours),
            ColumnConfig::new("ToDo")
                .label("Todo")
                .justify(Justify::Right)
                .format(ColumnFormat::Hours),
        ],
    }
}

pub fn default_project_query_config() -> ProjectQueryConfig {
    ProjectQueryConfig {
        delivery_groups: default_delivery_group_config(),
        features: default_feature_config(),
        stories: default_story_config(),
        tasks: default_task_config(),
        ..ProjectQueryConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_configured() {
        let config = default_project_query_config();
        assert!(config.is_configured());
        assert!(config.delivery_groups.is_configured());
        assert!(config.features.is_configured());
        assert!(config.stories.is_configured());
        assert!(config.tasks.is_configured());
    }

    #[test]
    fn test_delivery_groups_sort_by_planned_start() {
        let config = default_delivery_group_config();
        assert_eq!(config.sort, vec!["PlannedStart", "Name"]);
    }

    #[test]
    fn test_feature_filter_excludes_delivery_groups() {
        let config = default_feature_config();
        assert_eq!(config.filters, vec!["Category.Name!='Delivery Group'"]);
    }
}
