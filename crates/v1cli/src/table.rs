//! Table rendering driven by column configuration.

use serde_json::Value;

use v1cli_common::Colors;
use v1cli_config::AssetQueryConfig;
use v1cli_config::ColumnConfig;
use v1cli_config::ColumnFormat;
use v1cli_config::Justify;

/// Reads a possibly-dotted field from a result row.
///
/// V1 often returns `Status.Name` as a literal key; when it does not, the
/// dotted path is traversed through nested objects.
pub fn get_field<'a>(item: &'a Value, field: &str) -> Option<&'a Value> {
    if let Some(value) = item.get(field) {
        return Some(value);
    }
    if !field.contains('.') {
        return None;
    }
    let mut current = item;
    for part in field.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Formats a raw value for display.
pub fn format_value(value: Option<&Value>, format: Option<ColumnFormat>, max_width: Option<usize>) -> String {
    let rendered = match value {
        None | Some(Value::Null) => return "-".to_string(),
        Some(Value::Array(items)) => {
            if items.is_empty() {
                return "-".to_string();
            }
            items
                .iter()
                .map(render_scalar)
                .collect::<Vec<_>>()
                .join(", ")
        }
        Some(scalar) => render_scalar(scalar),
    };

    let formatted = match format {
        Some(ColumnFormat::Date) => {
            if rendered.is_empty() {
                "-".to_string()
            } else {
                rendered.chars().take(10).collect()
            }
        }
        Some(ColumnFormat::Percent) => match rendered.parse::<f64>() {
            Ok(fraction) => format!("{}%", (fraction * 100.0) as i64),
            Err(_) => "-".to_string(),
        },
        Some(ColumnFormat::Points) => match rendered.parse::<f64>() {
            Ok(points) => format!("{}", points as i64),
            Err(_) => "-".to_string(),
        },
        Some(ColumnFormat::Hours) => match rendered.parse::<f64>() {
            Ok(hours) => format!("{hours:.1}h"),
            Err(_) => "-".to_string(),
        },
        None => rendered,
    };

    truncate(&formatted, max_width)
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn truncate(text: &str, max_width: Option<usize>) -> String {
    match max_width {
        Some(width) if text.chars().count() > width && width > 3 => {
            let kept: String = text.chars().take(width - 3).collect();
            format!("{kept}...")
        }
        _ => text.to_string(),
    }
}

/// Renders rows as an aligned plain-text table.
///
/// Column widths come from the content; padding is applied before color so
/// alignment survives styling.
pub fn render_table(title: &str, columns: &[ColumnConfig], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(&Colors::bold(title));
        out.push('\n');
    }

    let labels: Vec<&str> = columns
        .iter()
        .map(|c| c.label.as_deref().unwrap_or(c.field.as_str()))
        .collect();

    let mut widths: Vec<usize> = labels.iter().map(|l| visible_width(l)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }
    }

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&Colors::bold(&pad(label, widths[i], Justify::Left)));
    }
    out.push('\n');
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&Colors::dim(&"─".repeat(*width)));
    }
    out.push('\n');

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            let column = &columns[i];
            let padded = pad(cell, widths[i], column.justify);
            match column.style.as_deref() {
                Some("cyan") => out.push_str(&Colors::info(&padded)),
                Some("dim") => out.push_str(&Colors::dim(&padded)),
                Some("bold") => out.push_str(&Colors::bold(&padded)),
                Some("magenta") => out.push_str(&Colors::highlight(&padded)),
                Some("green") => out.push_str(&Colors::success(&padded)),
                Some("yellow") => out.push_str(&Colors::warning(&padded)),
                _ => out.push_str(&padded),
            }
        }
        out.push('\n');
    }

    out
}

/// Character width ignoring ANSI escape sequences, so pre-colored cells
/// still align.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in text.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }
    width
}

fn pad(text: &str, width: usize, justify: Justify) -> String {
    let len = visible_width(text);
    if len >= width {
        return text.to_string();
    }
    let fill = width - len;
    match justify {
        Justify::Left => format!("{text}{}", " ".repeat(fill)),
        Justify::Right => format!("{}{text}", " ".repeat(fill)),
        Justify::Center => {
            let left = fill / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
        }
    }
}

/// Builds table rows for raw query results using an asset configuration.
pub fn rows_from_config(items: &[Value], config: &AssetQueryConfig) -> (Vec<ColumnConfig>, Vec<Vec<String>>) {
    let columns: Vec<ColumnConfig> = if config.columns.is_empty() {
        config
            .select
            .iter()
            .map(|field| ColumnConfig::new(field))
            .collect()
    } else {
        config.columns.clone()
    };

    let rows = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|col| format_value(get_field(item, &col.field), col.format, col.max_width))
                .collect()
        })
        .collect();

    (columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_field_dotted_key() {
        let item = json!({"Status.Name": "Done", "Name": "X"});
        assert_eq!(get_field(&item, "Status.Name"), Some(&json!("Done")));
        assert_eq!(get_field(&item, "Name"), Some(&json!("X")));
    }

    #[test]
    fn test_get_field_traverses_nested() {
        let item = json!({"Status": {"Name": "Done"}});
        assert_eq!(get_field(&item, "Status.Name"), Some(&json!("Done")));
        assert!(get_field(&item, "Status.Missing").is_none());
    }

    #[test]
    fn test_format_value_date() {
        let value = json!("2026-03-15T10:30:00.000");
        assert_eq!(
            format_value(Some(&value), Some(ColumnFormat::Date), None),
            "2026-03-15"
        );
    }

    #[test]
    fn test_format_value_percent() {
        let value = json!(0.62);
        assert_eq!(
            format_value(Some(&value), Some(ColumnFormat::Percent), None),
            "62%"
        );
        assert_eq!(
            format_value(Some(&json!("oops")), Some(ColumnFormat::Percent), None),
            "-"
        );
    }

    #[test]
    fn test_format_value_points_and_hours() {
        assert_eq!(
            format_value(Some(&json!(5.0)), Some(ColumnFormat::Points), None),
            "5"
        );
        assert_eq!(
            format_value(Some(&json!(2.5)), Some(ColumnFormat::Hours), None),
            "2.5h"
        );
    }

    #[test]
    fn test_format_value_list_join() {
        let value = json!(["Ada", "Grace"]);
        assert_eq!(format_value(Some(&value), None, None), "Ada, Grace");
        assert_eq!(format_value(Some(&json!([])), None, None), "-");
    }

    #[test]
    fn test_format_value_missing() {
        assert_eq!(format_value(None, None, None), "-");
        assert_eq!(format_value(Some(&Value::Null), None, None), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", Some(10)), "short");
        assert_eq!(truncate("a very long project name", Some(10)), "a very ...");
    }

    #[test]
    fn test_visible_width_ignores_ansi() {
        assert_eq!(visible_width("plain"), 5);
        assert_eq!(visible_width("\x1b[32m✓ done\x1b[0m"), 6);
    }

    #[test]
    fn test_rows_from_config_falls_back_to_select() {
        let config = AssetQueryConfig {
            select: vec!["Name".to_string()],
            ..AssetQueryConfig::default()
        };
        let items = vec![json!({"Name": "Alpha"})];
        let (columns, rows) = rows_from_config(&items, &config);
        assert_eq!(columns.len(), 1);
        assert_eq!(rows, vec![vec!["Alpha".to_string()]]);
    }
}
