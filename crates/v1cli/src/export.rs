//! File exports for listing commands (`--output`).

use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::commands::ExportFormat;

/// Writes raw query rows to a file.
///
/// JSON output renames `_oid` to `oid` and drops other internal keys; CSV
/// and table output derive the header from the first row.
pub fn write_rows(rows: &[Value], path: &Path, format: ExportFormat) -> std::io::Result<()> {
    match format {
        ExportFormat::Json => write_json(rows, path),
        ExportFormat::Csv => write_csv(rows, path),
        ExportFormat::Table => write_tsv(rows, path),
    }
}

fn public_keys(row: &Value) -> Vec<String> {
    row.as_object()
        .map(|map| {
            map.keys()
                .filter(|k| !k.starts_with('_'))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn write_json(rows: &[Value], path: &Path) -> std::io::Result<()> {
    let cleaned: Vec<Value> = rows
        .iter()
        .map(|row| {
            let mut out = serde_json::Map::new();
            if let Some(oid) = row.get("_oid") {
                out.insert("oid".to_string(), oid.clone());
            }
            if let Some(map) = row.as_object() {
                for (key, value) in map {
                    if !key.starts_with('_') {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
            Value::Object(out)
        })
        .collect();
    let text = serde_json::to_string_pretty(&cleaned)?;
    std::fs::write(path, text)
}

fn write_csv(rows: &[Value], path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let keys = public_keys(first);

    let mut header = vec!["oid".to_string()];
    header.extend(keys.iter().cloned());
    writeln!(file, "{}", header.iter().map(|h| csv_quote(h)).collect::<Vec<_>>().join(","))?;

    for row in rows {
        let mut cells = vec![row
            .get("_oid")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()];
        for key in &keys {
            cells.push(cell_text(row.get(key)));
        }
        writeln!(
            file,
            "{}",
            cells.iter().map(|c| csv_quote(c)).collect::<Vec<_>>().join(",")
        )?;
    }
    Ok(())
}

fn write_tsv(rows: &[Value], path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let keys = public_keys(first);
    writeln!(file, "{}", keys.join("\t"))?;
    for row in rows {
        let cells: Vec<String> = keys
            .iter()
            .map(|key| {
                let text = cell_text(row.get(key));
                if text.is_empty() {
                    "-".to_string()
                } else {
                    text
                }
            })
            .collect();
        writeln!(file, "{}", cells.join("\t"))?;
    }
    Ok(())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| cell_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

/// Minimal CSV quoting: wrap when the cell contains a comma, quote or
/// newline; embedded quotes double.
fn csv_quote(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
