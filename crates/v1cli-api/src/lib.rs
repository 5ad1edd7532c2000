#![deny(clippy::all)]

//! Blocking client for the VersionOne REST endpoints used by v1cli:
//! `/query.v1` for reads, `/api/asset` for writes and `/meta.v1/<Type>`
//! for schema metadata.

mod client;
mod detect;
mod error;
mod identifier;
mod models;
mod query;

pub use client::AttributeDef;
pub use client::V1Client;
pub use detect::auto_detect_project_config;
pub use error::ApiError;
pub use error::ErrorCategory;
pub use identifier::AssetKind;
pub use identifier::is_oid_token;
pub use identifier::normalize_number;
pub use models::DeliveryGroup;
pub use models::Feature;
pub use models::Member;
pub use models::Project;
pub use models::StatusInfo;
pub use models::Story;
pub use models::Task;
pub use query::AssetRow;
pub use query::QueryRequest;
