//! Filtering query configuration against the attributes an instance
//! actually has.
//!
//! Relation fields like `Status.Name` are validated by their base
//! attribute; sort keys may carry a leading `-` for descending order.

use std::collections::HashSet;

use crate::settings::ColumnConfig;

fn base_attribute(field: &str) -> &str {
    let field = field.strip_prefix('-').unwrap_or(field);
    field.split('.').next().unwrap_or(field)
}

/// Keeps only fields whose base attribute exists.
pub fn filter_valid_fields(desired: &[String], available: &HashSet<String>) -> Vec<String> {
    desired
        .iter()
        .filter(|field| available.contains(base_attribute(field)))
        .cloned()
        .collect()
}

/// Keeps only columns whose base attribute exists.
pub fn filter_valid_columns(
    desired: &[ColumnConfig],
    available: &HashSet<String>,
) -> Vec<ColumnConfig> {
    desired
        .iter()
        .filter(|col| available.contains(base_attribute(&col.field)))
        .cloned()
        .collect()
}
