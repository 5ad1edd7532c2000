//! Wire types for the `/query.v1` endpoint.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// A `/query.v1` request body.
///
/// The endpoint expects page bounds as strings, and returns results as a
/// nested array (one inner array per `from` clause).
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub from: String,
    pub select: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<String>>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub start: String,
    pub size: String,
}

impl QueryRequest {
    pub fn new(asset_type: &str, select: &[String]) -> Self {
        Self {
            from: asset_type.to_string(),
            select: select.to_vec(),
            filter: None,
            where_: None,
            sort: None,
            page: None,
        }
    }

    pub fn filter(mut self, conditions: Vec<String>) -> Self {
        if !conditions.is_empty() {
            self.filter = Some(conditions);
        }
        self
    }

    pub fn where_eq(mut self, attribute: &str, value: &str) -> Self {
        self.where_
            .get_or_insert_with(BTreeMap::new)
            .insert(attribute.to_string(), value.to_string());
        self
    }

    pub fn sort(mut self, keys: Vec<String>) -> Self {
        if !keys.is_empty() {
            self.sort = Some(keys);
        }
        self
    }

    pub fn page(mut self, start: usize, size: usize) -> Self {
        self.page = Some(Page {
            start: start.to_string(),
            size: size.to_string(),
        });
        self
    }
}

/// Unwraps the endpoint's nested-array envelope into rows.
pub fn parse_rows(body: Value) -> Result<Vec<AssetRow>, ApiError> {
    let rows = match body {
        Value::Array(outer) => {
            if matches!(outer.first(), Some(Value::Array(_))) {
                match outer.into_iter().next() {
                    Some(Value::Array(inner)) => inner,
                    _ => vec![],
                }
            } else {
                // Already flat: the elements are row objects.
                outer
            }
        }
        other => {
            return Err(ApiError::InvalidResponse(format!(
                "expected array from query.v1, got {}",
                type_name(&other)
            )));
        }
    };
    Ok(rows.into_iter().map(AssetRow).collect())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One query result row.
///
/// Relation attributes arrive in whatever shape the instance feels like:
/// a bare string, an object carrying `_oid`, or a list of either. The
/// accessors tolerate all of them.
#[derive(Debug, Clone)]
pub struct AssetRow(pub Value);

impl AssetRow {
    /// The row's own OID (`_oid` key).
    pub fn oid(&self) -> Result<String, ApiError> {
        self.0
            .get("_oid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidResponse("row missing _oid".to_string()))
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn string_or_empty(&self, key: &str) -> String {
        self.str_field(key).unwrap_or("").to_string()
    }

    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// OID of a relation attribute, whatever shape it arrived in.
    pub fn relation_oid(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(map) => map
                .get("_oid")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    }

    /// String values of a multi-value attribute (e.g. `Owners.Name`); a
    /// scalar string counts as a one-element list.
    pub fn names_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => vec![],
        }
    }

    /// OIDs of a multi-value relation attribute (e.g. `Owners`).
    pub fn relation_oids(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(map) => map
                        .get("_oid")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect(),
            Some(Value::Object(map)) => map
                .get("_oid")
                .and_then(Value::as_str)
                .map(|oid| vec![oid.to_string()])
                .unwrap_or_default(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => vec![],
        }
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_serialization() {
        let request = QueryRequest::new(
            "Story",
            &["Name".to_string(), "Number".to_string()],
        )
        .filter(vec!["AssetState!='Closed'".to_string()])
        .sort(vec!["-ChangeDateUTC".to_string()])
        .page(0, 50);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["from"], "Story");
        assert_eq!(value["select"], json!(["Name", "Number"]));
        assert_eq!(value["filter"], json!(["AssetState!='Closed'"]));
        assert_eq!(value["sort"], json!(["-ChangeDateUTC"]));
        // page bounds go over the wire as strings
        assert_eq!(value["page"], json!({"start": "0", "size": "50"}));
        assert!(value.get("where").is_none());
    }

    #[test]
    fn test_query_request_where_clause() {
        let request =
            QueryRequest::new("Member", &["Name".to_string()]).where_eq("IsSelf", "true");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["where"], json!({"IsSelf": "true"}));
        assert!(value.get("filter").is_none());
    }

    #[test]
    fn test_parse_rows_nested() {
        let body = json!([[{"_oid": "Story:1", "Name": "A"}, {"_oid": "Story:2", "Name": "B"}]]);
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].oid().unwrap(), "Story:1");
    }

    #[test]
    fn test_parse_rows_flat() {
        let body = json!([{"_oid": "Story:1", "Name": "A"}]);
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].str_field("Name"), Some("A"));
    }

    #[test]
    fn test_parse_rows_empty() {
        assert!(parse_rows(json!([])).unwrap().is_empty());
        assert!(parse_rows(json!([[]])).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows_rejects_non_array() {
        assert!(parse_rows(json!({"error": "nope"})).is_err());
    }

    #[test]
    fn test_relation_oid_shapes() {
        let row = AssetRow(json!({
            "_oid": "Story:1",
            "Status": {"_oid": "StoryStatus:134"},
            "Scope": "Scope:0",
            "Super": null,
        }));
        assert_eq!(row.relation_oid("Status").unwrap(), "StoryStatus:134");
        assert_eq!(row.relation_oid("Scope").unwrap(), "Scope:0");
        assert!(row.relation_oid("Super").is_none());
        assert!(row.relation_oid("Missing").is_none());
    }

    #[test]
    fn test_names_list_shapes() {
        let row = AssetRow(json!({
            "_oid": "Story:1",
            "Owners.Name": ["Ada", "Grace"],
        }));
        assert_eq!(row.names_list("Owners.Name"), vec!["Ada", "Grace"]);

        let scalar = AssetRow(json!({"Owners.Name": "Ada"}));
        assert_eq!(scalar.names_list("Owners.Name"), vec!["Ada"]);

        let empty = AssetRow(json!({"Owners.Name": ""}));
        assert!(empty.names_list("Owners.Name").is_empty());
    }

    #[test]
    fn test_relation_oids_shapes() {
        let row = AssetRow(json!({
            "Owners": [{"_oid": "Member:20"}, "Member:21"],
        }));
        assert_eq!(row.relation_oids("Owners"), vec!["Member:20", "Member:21"]);

        let single = AssetRow(json!({"Owners": {"_oid": "Member:20"}}));
        assert_eq!(single.relation_oids("Owners"), vec!["Member:20"]);
    }
}
