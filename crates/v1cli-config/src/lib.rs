#![deny(clippy::all)]

//! Local configuration for v1cli: credentials from the environment, the
//! opinionated status workflow, persisted settings (bookmarks, status
//! mapping, per-project query configuration) and schema-driven filtering
//! of query fields.

mod auth;
mod defaults;
mod schema;
mod settings;
mod workflow;

pub use auth::AuthError;
pub use auth::Credentials;
pub use defaults::DELIVERY_GROUP_FILTERS;
pub use defaults::DELIVERY_GROUP_SELECT;
pub use defaults::FEATURE_FILTERS;
pub use defaults::FEATURE_SELECT;
pub use defaults::STORY_SELECT;
pub use defaults::TASK_SELECT;
pub use defaults::default_delivery_group_config;
pub use defaults::default_feature_config;
pub use defaults::default_project_query_config;
pub use defaults::default_story_config;
pub use defaults::default_task_config;
pub use schema::filter_valid_columns;
pub use schema::filter_valid_fields;
pub use settings::AssetQueryConfig;
pub use settings::ColumnConfig;
pub use settings::ColumnFormat;
pub use settings::ConfigError;
pub use settings::Justify;
pub use settings::ProjectBookmark;
pub use settings::ProjectQueryConfig;
pub use settings::Settings;
pub use settings::StatusMapping;
pub use settings::config_dir;
pub use settings::settings_path;
pub use workflow::StoryStatus;
pub use workflow::can_transition;
pub use workflow::valid_transitions;
