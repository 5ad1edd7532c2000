//! The VersionOne REST client.

use std::time::Duration;
use std::time::Instant;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use serde_json::Value;
use serde_json::json;
use tracing::debug;

use v1cli_config::Credentials;
use v1cli_config::DELIVERY_GROUP_FILTERS;
use v1cli_config::FEATURE_SELECT;
use v1cli_config::STORY_SELECT;
use v1cli_config::TASK_SELECT;

use crate::error::ApiError;
use crate::identifier::AssetKind;
use crate::identifier::is_oid_token_of;
use crate::identifier::normalize_number;
use crate::models::DeliveryGroup;
use crate::models::Feature;
use crate::models::Member;
use crate::models::Project;
use crate::models::StatusInfo;
use crate::models::Story;
use crate::models::Task;
use crate::query::AssetRow;
use crate::query::QueryRequest;
use crate::query::parse_rows;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct V1Client {
    http: Client,
    base_url: String,
}

impl V1Client {
    pub fn new(credentials: Credentials) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            credentials.token
        ))
        .map_err(|_| ApiError::Configuration("V1_TOKEN contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .danger_accept_invalid_certs(!credentials.verify_ssl)
            .build()?;

        Ok(Self {
            http,
            base_url: credentials.base_url,
        })
    }

    // Wire primitives

    pub fn query(&self, request: &QueryRequest) -> Result<Vec<AssetRow>, ApiError> {
        let url = format!("{}/query.v1", self.base_url);
        let started = Instant::now();
        let response = self.http.post(&url).json(request).send()?;
        debug!(
            asset_type = %request.from,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query.v1"
        );
        let body = check_response(response)?;
        parse_rows(body)
    }

    /// Creates an asset; returns its OID.
    pub fn create(&self, asset_type: &str, attributes: Value) -> Result<String, ApiError> {
        let url = format!("{}/api/asset", self.base_url);
        let mut payload = json!({ "AssetType": asset_type });
        merge(&mut payload, attributes);
        let response = self.http.post(&url).json(&payload).send()?;
        debug!(asset_type, "create asset");
        let body = check_response(response)?;
        body.get("oid")
            .or_else(|| body.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidResponse("create returned no oid".to_string()))
    }

    pub fn update(&self, oid: &str, attributes: Value) -> Result<(), ApiError> {
        let url = format!("{}/api/asset", self.base_url);
        let payload = json!({ "from": oid, "update": attributes });
        let response = self.http.post(&url).json(&payload).send()?;
        debug!(oid, "update asset");
        check_response(response)?;
        Ok(())
    }

    pub fn meta(&self, asset_type: &str) -> Result<Value, ApiError> {
        let url = format!("{}/meta.v1/{}", self.base_url, asset_type);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;
        debug!(asset_type, "meta.v1");
        check_response(response)
    }

    /// Available attributes for an asset type, sorted by name.
    ///
    /// Internal attributes (leading underscore) are skipped.
    pub fn asset_attributes(&self, asset_type: &str) -> Result<Vec<AttributeDef>, ApiError> {
        let meta = self.meta(asset_type)?;
        let mut attributes: Vec<AttributeDef> = meta
            .get("Attributes")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| !key.starts_with('_'))
                    .map(|(key, attr)| AttributeDef {
                        name: attr
                            .get("Name")
                            .and_then(Value::as_str)
                            .unwrap_or(key)
                            .to_string(),
                        attribute_type: attr
                            .get("AttributeType")
                            .and_then(Value::as_str)
                            .unwrap_or("Unknown")
                            .to_string(),
                        is_readonly: attr
                            .get("IsReadonly")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                        is_required: attr
                            .get("IsRequired")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                        is_multi_value: attr
                            .get("IsMultivalue")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                        related_asset: attr
                            .get("RelatedAsset")
                            .and_then(|r| r.get("nameref"))
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();
        attributes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(attributes)
    }

    /// Query driven by a configured field list instead of a hardcoded one.
    #[allow(clippy::too_many_arguments)]
    pub fn query_with_config(
        &self,
        asset_type: &str,
        parent_oid: Option<&str>,
        parent_field: &str,
        config_select: &[String],
        config_filters: &[String],
        config_sort: &[String],
        include_done: bool,
    ) -> Result<Vec<AssetRow>, ApiError> {
        let mut filters: Vec<String> = Vec::new();
        if let Some(oid) = parent_oid {
            filters.push(format!("{parent_field}='{oid}'"));
        }
        filters.extend(config_filters.iter().cloned());
        if !include_done {
            filters.push("AssetState!='Closed'".to_string());
        }

        let select = if config_select.is_empty() {
            vec!["Name".to_string(), "Number".to_string()]
        } else {
            config_select.to_vec()
        };
        let sort = if config_sort.is_empty() {
            vec!["Name".to_string()]
        } else {
            config_sort.to_vec()
        };

        self.query(&QueryRequest::new(asset_type, &select).filter(filters).sort(sort))
    }

    // Members

    pub fn me(&self) -> Result<Member, ApiError> {
        let select: Vec<String> = ["Name", "Email", "Username"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = self.query(&QueryRequest::new("Member", &select).where_eq("IsSelf", "true"))?;
        let row = rows.first().ok_or(ApiError::NoCurrentUser)?;
        Ok(Member {
            oid: row.oid()?,
            name: row.string_or_empty("Name"),
            email: row.str_field("Email").filter(|e| !e.is_empty()).map(str::to_string),
            username: row
                .str_field("Username")
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        })
    }

    // Stories

    pub fn my_stories(
        &self,
        project_oids: Option<&[String]>,
        include_done: bool,
    ) -> Result<Vec<Story>, ApiError> {
        let mut filters = vec!["Owners.IsSelf='true'".to_string()];
        if !include_done {
            filters.push("AssetState!='Closed'".to_string());
        }
        if let Some(oids) = project_oids {
            if !oids.is_empty() {
                let scopes: Vec<String> =
                    oids.iter().map(|oid| format!("Scope='{oid}'")).collect();
                filters.push(format!("({})", scopes.join("|")));
            }
        }
        self.stories_with_filters(filters)
    }

    /// Stories whose parent (`Super`) is the given feature or story.
    pub fn stories_under(&self, parent_oid: &str, include_done: bool) -> Result<Vec<Story>, ApiError> {
        let mut filters = vec![format!("Super='{parent_oid}'")];
        if !include_done {
            filters.push("AssetState!='Closed'".to_string());
        }
        self.stories_with_filters(filters)
    }

    fn stories_with_filters(&self, filters: Vec<String>) -> Result<Vec<Story>, ApiError> {
        let select: Vec<String> = STORY_SELECT.iter().map(|s| s.to_string()).collect();
        let rows = self.query(
            &QueryRequest::new("Story", &select)
                .filter(filters)
                .sort(vec!["-ChangeDateUTC".to_string()]),
        )?;
        rows.iter().map(Story::from_row).collect()
    }

    /// Story by display number (`S-1234`, bare `1234`) or OID token.
    pub fn story_by_number(&self, identifier: &str) -> Result<Option<Story>, ApiError> {
        let select: Vec<String> = STORY_SELECT.iter().map(|s| s.to_string()).collect();
        let request = QueryRequest::new("Story", &select);
        let request = if is_oid_token_of(identifier, AssetKind::Story) {
            request.filter(vec![format!("ID='{identifier}'")])
        } else {
            request.where_eq("Number", &normalize_number(identifier, AssetKind::Story))
        };
        let rows = self.query(&request)?;
        rows.first().map(Story::from_row).transpose()
    }

    pub fn set_story_status(&self, story_oid: &str, status_oid: &str) -> Result<(), ApiError> {
        self.update(story_oid, json!({ "Status": status_oid }))
    }

    pub fn assign_story(&self, story_oid: &str, member_oid: &str) -> Result<(), ApiError> {
        self.update(story_oid, json!({ "Owners": member_oid }))
    }

    pub fn create_story(
        &self,
        name: &str,
        project_oid: &str,
        feature_oid: Option<&str>,
        estimate: Option<f64>,
        description: &str,
    ) -> Result<String, ApiError> {
        let mut attrs = json!({ "Name": name, "Scope": project_oid });
        if let Some(oid) = feature_oid {
            attrs["Super"] = json!(oid);
        }
        if let Some(points) = estimate {
            attrs["Estimate"] = json!(points);
        }
        if !description.is_empty() {
            attrs["Description"] = json!(description);
        }
        self.create("Story", attrs)
    }

    // Projects

    /// Projects: Business Epics, by default restricted to Implementation
    /// status.
    pub fn projects(&self, include_all_statuses: bool) -> Result<Vec<Project>, ApiError> {
        let mut filters = vec![
            "AssetState!='Closed'".to_string(),
            "(Category.Name='Business Epic')".to_string(),
        ];
        if !include_all_statuses {
            filters.push("Status.Name='Implementation'".to_string());
        }
        let select: Vec<String> = [
            "Name",
            "Description",
            "Number",
            "Category.Name",
            "Scope.Name",
            "Super.Name",
            "Status.Name",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rows = self.query(
            &QueryRequest::new("Epic", &select)
                .filter(filters)
                .sort(vec!["Name".to_string()]),
        )?;
        rows.iter().map(Project::from_row).collect()
    }

    /// Project by display number (`E-100`, bare `100`) or OID token.
    pub fn project_by_number(&self, identifier: &str) -> Result<Option<Project>, ApiError> {
        let select: Vec<String> = [
            "Name",
            "Description",
            "Number",
            "Category.Name",
            "Scope.Name",
            "Super.Name",
            "Status.Name",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let request = QueryRequest::new("Epic", &select);
        let request = if is_oid_token_of(identifier, AssetKind::Epic) {
            request.filter(vec![format!("ID='{identifier}'")])
        } else {
            request.where_eq("Number", &normalize_number(identifier, AssetKind::Epic))
        };
        let rows = self.query(&request)?;
        rows.first().map(Project::from_row).transpose()
    }

    /// Project by case-insensitive name substring.
    pub fn project_by_name(&self, name: &str) -> Result<Option<Project>, ApiError> {
        let needle = name.to_lowercase();
        Ok(self
            .projects(false)?
            .into_iter()
            .find(|p| p.name.to_lowercase().contains(&needle)))
    }

    /// Project fields for an arbitrary Epic OID (bookmarks may point at
    /// Epics outside the Business Epic category).
    pub fn project_by_oid(&self, oid: &str) -> Result<Option<Project>, ApiError> {
        let select: Vec<String> = [
            "Name",
            "Number",
            "Category.Name",
            "Super.Name",
            "Status.Name",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rows =
            self.query(&QueryRequest::new("Epic", &select).filter(vec![format!("ID='{oid}'")]))?;
        rows.first().map(Project::from_row).transpose()
    }

    // Delivery groups and features

    pub fn delivery_groups(
        &self,
        project_oid: &str,
        include_done: bool,
    ) -> Result<Vec<DeliveryGroup>, ApiError> {
        let mut filters = vec![format!("Super='{project_oid}'")];
        filters.extend(DELIVERY_GROUP_FILTERS.iter().map(|f| f.to_string()));
        if !include_done {
            filters.push("AssetState!='Closed'".to_string());
        }
        let select: Vec<String> = [
            "Name",
            "Number",
            "Status.Name",
            "PlannedStart",
            "PlannedEnd",
            "Category.Name",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rows = self.query(
            &QueryRequest::new("Epic", &select)
                .filter(filters)
                .sort(vec!["PlannedStart".to_string(), "Name".to_string()]),
        )?;
        rows.iter().map(DeliveryGroup::from_row).collect()
    }

    /// Features: child Epics that are not Delivery Groups.
    pub fn features_under(
        &self,
        parent_oid: &str,
        include_done: bool,
    ) -> Result<Vec<Feature>, ApiError> {
        let mut filters = vec![
            format!("Super='{parent_oid}'"),
            "Category.Name!='Delivery Group'".to_string(),
        ];
        if !include_done {
            filters.push("AssetState!='Closed'".to_string());
        }
        let select: Vec<String> = FEATURE_SELECT
            .iter()
            .map(|s| s.to_string())
            .chain(std::iter::once("Category.Name".to_string()))
            .collect();
        let rows = self.query(
            &QueryRequest::new("Epic", &select)
                .filter(filters)
                .sort(vec!["-ChangeDateUTC".to_string()]),
        )?;
        rows.iter().map(Feature::from_row).collect()
    }

    pub fn feature_by_number(&self, identifier: &str) -> Result<Option<Feature>, ApiError> {
        let select: Vec<String> = FEATURE_SELECT.iter().map(|s| s.to_string()).collect();
        let request = QueryRequest::new("Epic", &select);
        let request = if is_oid_token_of(identifier, AssetKind::Epic) {
            request.filter(vec![format!("ID='{identifier}'")])
        } else {
            request.where_eq("Number", &normalize_number(identifier, AssetKind::Epic))
        };
        let rows = self.query(&request)?;
        rows.first().map(Feature::from_row).transpose()
    }

    pub fn create_feature(
        &self,
        name: &str,
        parent_oid: &str,
        description: &str,
    ) -> Result<String, ApiError> {
        let mut attrs = json!({ "Name": name, "Super": parent_oid });
        if !description.is_empty() {
            attrs["Description"] = json!(description);
        }
        self.create("Epic", attrs)
    }

    // Tasks

    pub fn tasks_for(&self, story_oid: &str) -> Result<Vec<Task>, ApiError> {
        let select: Vec<String> = TASK_SELECT.iter().map(|s| s.to_string()).collect();
        let rows = self.query(
            &QueryRequest::new("Task", &select)
                .filter(vec![format!("Parent='{story_oid}'")])
                .sort(vec!["Order".to_string()]),
        )?;
        rows.iter().map(Task::from_row).collect()
    }

    /// Task by display number (`TK-90`, bare `90`) or OID token.
    pub fn task_by_identifier(&self, identifier: &str) -> Result<Option<Task>, ApiError> {
        let select: Vec<String> = TASK_SELECT.iter().map(|s| s.to_string()).collect();
        let request = QueryRequest::new("Task", &select);
        let request = if is_oid_token_of(identifier, AssetKind::Task) {
            request.filter(vec![format!("ID='{identifier}'")])
        } else {
            request.where_eq("Number", &normalize_number(identifier, AssetKind::Task))
        };
        let rows = self.query(&request)?;
        rows.first().map(Task::from_row).transpose()
    }

    pub fn create_task(
        &self,
        name: &str,
        story_oid: &str,
        estimate_hours: Option<f64>,
    ) -> Result<String, ApiError> {
        let mut attrs = json!({ "Name": name, "Parent": story_oid });
        if let Some(hours) = estimate_hours {
            attrs["ToDo"] = json!(hours);
        }
        self.create("Task", attrs)
    }

    /// Marks a task done by zeroing its remaining hours.
    pub fn complete_task(&self, task_oid: &str) -> Result<(), ApiError> {
        self.update(task_oid, json!({ "ToDo": 0 }))
    }

    // Statuses

    pub fn story_statuses(&self) -> Result<Vec<StatusInfo>, ApiError> {
        let select = vec!["Name".to_string()];
        let rows = self.query(
            &QueryRequest::new("StoryStatus", &select).sort(vec!["Order".to_string()]),
        )?;
        rows.iter()
            .map(|row| {
                Ok(StatusInfo {
                    oid: row.oid()?,
                    name: row.string_or_empty("Name"),
                })
            })
            .collect()
    }
}

/// One attribute definition from `/meta.v1`.
#[derive(Debug, Clone)]
pub struct AttributeDef {
    pub name: String,
    pub attribute_type: String,
    pub is_readonly: bool,
    pub is_required: bool,
    pub is_multi_value: bool,
    pub related_asset: Option<String>,
}

fn check_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::AuthenticationFailed);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if status.is_client_error() || status.is_server_error() {
        let text = response.text().unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or(text);
        return Err(ApiError::Remote {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json()
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

fn merge(target: &mut Value, extra: Value) {
    if let (Value::Object(target_map), Value::Object(extra_map)) = (target, extra) {
        for (key, value) in extra_map {
            target_map.insert(key, value);
        }
    }
}
