//! Schema auto-detection.
//!
//! Queries `/meta.v1` for the attributes an instance actually has and trims
//! the default query configurations down to valid fields, so commands never
//! select attributes a customized instance lacks.

use std::collections::HashSet;

use chrono::SecondsFormat;
use chrono::Utc;
use tracing::warn;

use v1cli_config::AssetQueryConfig;
use v1cli_config::ProjectQueryConfig;
use v1cli_config::default_delivery_group_config;
use v1cli_config::default_feature_config;
use v1cli_config::default_story_config;
use v1cli_config::default_task_config;
use v1cli_config::filter_valid_columns;
use v1cli_config::filter_valid_fields;

use crate::client::V1Client;
use crate::error::ApiError;

fn available_attributes(client: &V1Client, asset_type: &str) -> HashSet<String> {
    match client.asset_attributes(asset_type) {
        Ok(attributes) => attributes.into_iter().map(|a| a.name).collect(),
        Err(err) => {
            warn!(asset_type, %err, "schema fetch failed; keeping defaults");
            HashSet::new()
        }
    }
}

fn detect_asset_config(
    client: &V1Client,
    asset_type: &str,
    defaults: AssetQueryConfig,
) -> AssetQueryConfig {
    let available = available_attributes(client, asset_type);
    if available.is_empty() {
        // No schema to validate against; the defaults may still work.
        return defaults;
    }

    AssetQueryConfig {
        select: filter_valid_fields(&defaults.select, &available),
        // Filters are kept as-is
        filters: defaults.filters.clone(),
        sort: filter_valid_fields(&defaults.sort, &available),
        columns: filter_valid_columns(&defaults.columns, &available),
    }
}

/// Builds a query configuration containing only fields this instance has.
pub fn auto_detect_project_config(client: &V1Client) -> Result<ProjectQueryConfig, ApiError> {
    Ok(ProjectQueryConfig {
        last_detected: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        delivery_groups: detect_asset_config(client, "Epic", default_delivery_group_config()),
        features: detect_asset_config(client, "Epic", default_feature_config()),
        stories: detect_asset_config(client, "Story", default_story_config()),
        tasks: detect_asset_config(client, "Task", default_task_config()),
        ..ProjectQueryConfig::default()
    })
}
