//! Roadmap and feature commands.

use v1cli_common::Colors;

use crate::commands::ExportFormat;
use crate::export;
use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;
use crate::handlers::print_json;
use crate::resolve;
use crate::table;

pub fn handle_roadmap(
    ctx: &mut HandlerContext,
    project: Option<String>,
    include_done: bool,
    output: Option<String>,
    output_format: ExportFormat,
) -> HandlerResult {
    let (project_oid, query_config) = resolve::project_with_config(ctx, project.as_deref())?;
    let group_config = query_config.delivery_groups;

    let rows = ctx.client()?.query_with_config(
        "Epic",
        Some(&project_oid),
        "Super",
        &group_config.select,
        &group_config.filters,
        &group_config.sort,
        include_done,
    )?;
    let values: Vec<serde_json::Value> = rows.into_iter().map(|row| row.into_value()).collect();

    if values.is_empty() {
        ctx.presenter()
            .present_raw(&Colors::warning("No delivery groups found."));
        return Ok(());
    }

    if let Some(path) = output {
        export::write_rows(&values, std::path::Path::new(&path), output_format)?;
        ctx.presenter().present_raw(&Colors::success(&format!(
            "Wrote {} delivery groups to {}",
            values.len(),
            path
        )));
        return Ok(());
    }

    if ctx.is_json() {
        return print_json(ctx, &values);
    }

    let (columns, table_rows) = table::rows_from_config(&values, &group_config);
    ctx.presenter().present_raw(&table::render_table(
        "Roadmap (Delivery Groups)",
        &columns,
        &table_rows,
    ));
    ctx.presenter()
        .present_info(&format!("Total: {} delivery groups", values.len()));
    Ok(())
}

pub fn handle_features(
    ctx: &mut HandlerContext,
    parent: Option<String>,
    include_done: bool,
) -> HandlerResult {
    let parent_oid = resolve::project_oid(ctx, parent.as_deref())?;
    let client = ctx.client()?;

    // Features directly under the parent, plus those under each delivery
    // group when the parent is a project.
    let mut features = client.features_under(&parent_oid, include_done)?;
    for group in client.delivery_groups(&parent_oid, include_done)? {
        features.extend(client.features_under(&group.oid, include_done)?);
    }

    if features.is_empty() {
        if ctx.is_json() {
            ctx.presenter().present_raw("[]");
        } else {
            ctx.presenter()
                .present_raw(&Colors::warning("No features found."));
        }
        return Ok(());
    }

    let cached: Vec<(String, String)> = features
        .iter()
        .map(|f| (f.number.clone(), f.oid.clone()))
        .collect();
    ctx.storage.cache_features(&cached);

    if ctx.is_json() {
        return print_json(ctx, &features);
    }

    let columns = vec![
        v1cli_config::ColumnConfig::new("#")
            .style("dim")
            .justify(v1cli_config::Justify::Right),
        v1cli_config::ColumnConfig::new("Number").style("cyan"),
        v1cli_config::ColumnConfig::new("Name"),
        v1cli_config::ColumnConfig::new("Status"),
        v1cli_config::ColumnConfig::new("Parent").style("dim"),
    ];
    let rows: Vec<Vec<String>> = features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            vec![
                format!("{}", i + 1),
                feature.number.clone(),
                table::truncate(&feature.name, Some(50)),
                feature.status.clone().unwrap_or_else(|| "-".to_string()),
                feature
                    .parent_name
                    .clone()
                    .unwrap_or_else(|| feature.scope_name.clone()),
            ]
        })
        .collect();

    ctx.presenter()
        .present_raw(&table::render_table("Features", &columns, &rows));
    ctx.presenter()
        .present_info(&format!("Total: {} features", features.len()));
    Ok(())
}

pub fn handle_feature_create(
    ctx: &mut HandlerContext,
    name: String,
    parent: Option<String>,
    description: String,
) -> HandlerResult {
    let parent_oid = resolve::project_oid(ctx, parent.as_deref())?;

    let oid = ctx
        .client()?
        .create_feature(&name, &parent_oid, &description)?;

    ctx.presenter()
        .present_raw(&format!("{} {}", Colors::success("Created feature:"), oid));
    ctx.presenter().present_kv("Name", &name);
    Ok(())
}
