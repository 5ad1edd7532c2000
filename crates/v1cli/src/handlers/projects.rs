//! Project bookmark commands.

use serde_json::Value;
use serde_json::json;

use v1cli_api::Project;
use v1cli_api::auto_detect_project_config;
use v1cli_common::Colors;
use v1cli_config::ProjectBookmark;

use crate::commands::ExportFormat;
use crate::export;
use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;
use crate::resolve;
use crate::table;

pub fn handle_projects_list(ctx: &mut HandlerContext) -> HandlerResult {
    let settings = ctx.storage.settings()?;
    if settings.bookmarks.is_empty() {
        ctx.presenter()
            .present_raw(&Colors::warning("No bookmarked projects."));
        ctx.presenter()
            .present_info("Use 'v1 projects add <number>' to bookmark a project.");
        return Ok(());
    }

    if ctx.is_json() {
        let value = serde_json::to_value(&settings.bookmarks)?;
        ctx.presenter().present_value(&value);
        return Ok(());
    }

    let default_oid = settings.default_project.as_deref();

    let columns = vec![
        v1cli_config::ColumnConfig::new("#")
            .style("yellow")
            .justify(v1cli_config::Justify::Right),
        v1cli_config::ColumnConfig::new("V1 Number").style("cyan"),
        v1cli_config::ColumnConfig::new("Name"),
        v1cli_config::ColumnConfig::new("Default").style("green"),
    ];
    let rows: Vec<Vec<String>> = settings
        .bookmarks
        .iter()
        .enumerate()
        .map(|(i, bookmark)| {
            let number = bookmark
                .oid
                .split_once(':')
                .map(|(_, digits)| format!("E-{digits}"))
                .unwrap_or_default();
            let default = if Some(bookmark.oid.as_str()) == default_oid {
                "★"
            } else {
                ""
            };
            vec![
                format!("{}", i + 1),
                number,
                bookmark.name.clone(),
                default.to_string(),
            ]
        })
        .collect();

    ctx.presenter()
        .present_raw(&table::render_table("Bookmarked Projects", &columns, &rows));
    ctx.presenter()
        .present_info(&format!("Total: {} bookmarks", settings.bookmarks.len()));
    ctx.presenter()
        .present_info("Use project # (1, 2, ...) as shorthand in commands");
    Ok(())
}

pub fn handle_projects_all(
    ctx: &mut HandlerContext,
    output: Option<String>,
    output_format: ExportFormat,
) -> HandlerResult {
    let projects = ctx.client()?.projects(false)?;

    if projects.is_empty() {
        ctx.presenter()
            .present_raw(&Colors::warning("No projects found."));
        return Ok(());
    }

    if let Some(path) = output {
        let rows = project_rows(&projects);
        export::write_rows(&rows, std::path::Path::new(&path), output_format)?;
        ctx.presenter().present_raw(&Colors::success(&format!(
            "Wrote {} projects to {}",
            projects.len(),
            path
        )));
        return Ok(());
    }

    if ctx.is_json() {
        let value = serde_json::to_value(&projects)?;
        ctx.presenter().present_value(&value);
        return Ok(());
    }

    let settings = ctx.storage.settings()?;
    let bookmarked: Vec<&str> = settings.bookmarks.iter().map(|b| b.oid.as_str()).collect();
    let default_oid = settings.default_project.as_deref();

    let columns = vec![
        v1cli_config::ColumnConfig::new("Number").style("cyan"),
        v1cli_config::ColumnConfig::new("Name"),
        v1cli_config::ColumnConfig::new("Status").style("magenta"),
        v1cli_config::ColumnConfig::new("Parent").style("dim"),
        v1cli_config::ColumnConfig::new("★").style("green"),
    ];
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|project| {
            let marker = if bookmarked.contains(&project.oid.as_str()) {
                if Some(project.oid.as_str()) == default_oid {
                    "★ def"
                } else {
                    "★"
                }
            } else {
                ""
            };
            vec![
                project.number.clone(),
                project.name.clone(),
                project.status.clone().unwrap_or_else(|| "-".to_string()),
                project
                    .parent_name
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                marker.to_string(),
            ]
        })
        .collect();

    ctx.presenter().present_raw(&table::render_table(
        "All Projects (Implementation)",
        &columns,
        &rows,
    ));
    ctx.presenter()
        .present_info(&format!("Total: {} projects", projects.len()));
    Ok(())
}

fn project_rows(projects: &[Project]) -> Vec<Value> {
    projects
        .iter()
        .map(|p| {
            json!({
                "_oid": p.oid,
                "Number": p.number,
                "Name": p.name,
                "Category": p.category,
                "Parent": p.parent_name,
                "Scope": p.scope_name,
            })
        })
        .collect()
}

pub fn handle_projects_add(ctx: &mut HandlerContext, identifier: String) -> HandlerResult {
    let is_number =
        resolve::looks_like_number(&identifier) || v1cli_api::is_oid_token(&identifier);

    let project = if is_number {
        ctx.client()?.project_by_number(&identifier)?
    } else {
        ctx.client()?.project_by_name(&identifier)?
    };

    let Some(project) = project else {
        ctx.exit_not_found(&format!("Project not found: {identifier}"), None);
    };

    ctx.storage.add_project_bookmark(&project.name, &project.oid)?;
    ctx.presenter().present_raw(&format!(
        "{} {} - {}",
        Colors::success("Bookmarked:"),
        project.number,
        project.name
    ));
    Ok(())
}

pub fn handle_projects_rm(ctx: &mut HandlerContext, identifier: String) -> HandlerResult {
    match ctx.storage.remove_project_bookmark(&identifier)? {
        Some((name, oid)) => {
            ctx.presenter().present_raw(&format!(
                "{} {} ({})",
                Colors::success("Removed bookmark:"),
                name,
                oid
            ));
        }
        None => {
            ctx.presenter().present_raw(&Colors::warning(&format!(
                "Bookmark not found: {identifier}"
            )));
        }
    }
    Ok(())
}

pub fn handle_projects_default(ctx: &mut HandlerContext, identifier: String) -> HandlerResult {
    let settings = ctx.storage.settings()?;
    if let Some(bookmark) = settings.get_bookmark(&identifier) {
        let name = bookmark.name.clone();
        let oid = bookmark.oid.clone();
        ctx.storage.set_default_project(&oid)?;
        ctx.presenter()
            .present_raw(&format!("{} {}", Colors::success("Default project set:"), name));
        return Ok(());
    }

    // Not bookmarked yet: a fetchable number is bookmarked on the fly.
    if resolve::looks_like_number(&identifier) {
        if let Some(project) = ctx.client()?.project_by_number(&identifier)? {
            ctx.storage.add_project_bookmark(&project.name, &project.oid)?;
            ctx.storage.set_default_project(&project.oid)?;
            ctx.presenter().present_raw(&format!(
                "{} {} - {}",
                Colors::success("Bookmarked and set as default:"),
                project.number,
                project.name
            ));
            return Ok(());
        }
    }

    ctx.exit_not_found(
        &format!("Project not found: {identifier}"),
        Some("Use 'v1 projects add <number>' to bookmark a project first."),
    );
}

pub fn handle_projects_configure(
    ctx: &mut HandlerContext,
    identifier: Option<String>,
    auto_detect: bool,
    reset: bool,
    show: bool,
) -> HandlerResult {
    let mut settings = ctx.storage.settings()?;

    let bookmark_oid = match &identifier {
        Some(identifier) => match settings.get_bookmark(identifier) {
            Some(bookmark) => bookmark.oid.clone(),
            None => ctx.exit_not_found(
                &format!("Project not found: {identifier}"),
                Some("Use 'v1 projects add <number>' to bookmark first."),
            ),
        },
        None => match settings.default_project.clone() {
            Some(oid) => {
                if !settings.bookmarks.iter().any(|b| b.oid == oid) {
                    ctx.exit_not_found("Default project not found in bookmarks.", None);
                }
                oid
            }
            None => ctx.exit_usage(
                "No project specified and no default set.",
                Some("Use 'v1 projects configure <identifier>' or set a default first."),
            ),
        },
    };

    if show {
        let bookmark = settings.bookmarks.iter().find(|b| b.oid == bookmark_oid);
        if let Some(bookmark) = bookmark {
            show_project_config(ctx, bookmark);
        }
        return Ok(());
    }

    if reset {
        if let Some(bookmark) = settings.bookmarks.iter_mut().find(|b| b.oid == bookmark_oid) {
            let name = bookmark.name.clone();
            bookmark.query_config = None;
            ctx.storage.save(&settings)?;
            ctx.presenter()
                .present_raw(&Colors::success(&format!("Reset configuration for {name}")));
            ctx.presenter()
                .present_info("Project will use default query settings.");
        }
        return Ok(());
    }

    if auto_detect {
        let name = settings
            .bookmarks
            .iter()
            .find(|b| b.oid == bookmark_oid)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        ctx.presenter()
            .present_header(&format!("Detecting schema for {name}..."));

        let config = auto_detect_project_config(ctx.client()?)?;
        let summary = [
            ("Delivery Groups", config.delivery_groups.select.len()),
            ("Features", config.features.select.len()),
            ("Stories", config.stories.select.len()),
            ("Tasks", config.tasks.select.len()),
        ];
        if let Some(bookmark) = settings.bookmarks.iter_mut().find(|b| b.oid == bookmark_oid) {
            bookmark.query_config = Some(config);
        }
        ctx.storage.save(&settings)?;

        ctx.presenter()
            .present_raw(&Colors::success("Configuration saved!"));
        for (label, count) in summary {
            ctx.presenter()
                .present_raw(&format!("  {label}: {count} fields"));
        }
        ctx.presenter()
            .present_info("\nRun 'v1 projects configure --show' to see details.");
        return Ok(());
    }

    // No flags: show the config when one exists, hint otherwise.
    let bookmark = settings.bookmarks.iter().find(|b| b.oid == bookmark_oid);
    if let Some(bookmark) = bookmark {
        if bookmark
            .query_config
            .as_ref()
            .is_some_and(|c| c.is_configured())
        {
            show_project_config(ctx, bookmark);
        } else {
            ctx.presenter().present_raw(&Colors::warning(&format!(
                "No custom configuration for {}",
                bookmark.name
            )));
            ctx.presenter()
                .present_info("Use --auto-detect to configure based on your V1 schema.");
        }
    }
    Ok(())
}

fn show_project_config(ctx: &HandlerContext, bookmark: &ProjectBookmark) {
    ctx.presenter()
        .present_header(&format!("\nQuery Configuration: {}", bookmark.name));

    let Some(config) = bookmark
        .query_config
        .as_ref()
        .filter(|c| c.is_configured())
    else {
        ctx.presenter()
            .present_raw(&Colors::warning("Using default configuration"));
        return;
    };

    ctx.presenter().present_info(&format!(
        "Last detected: {}\n",
        config.last_detected.as_deref().unwrap_or("Never")
    ));

    for (name, asset_config) in [
        ("Delivery Groups", &config.delivery_groups),
        ("Features", &config.features),
        ("Stories", &config.stories),
        ("Tasks", &config.tasks),
    ] {
        ctx.presenter().present_raw(&Colors::info(name));
        if asset_config.select.is_empty() {
            ctx.presenter().present_raw(&format!(
                "  Select: {}",
                Colors::dim("(default)")
            ));
        } else {
            ctx.presenter()
                .present_raw(&format!("  Select: {}", asset_config.select.join(", ")));
        }
        if !asset_config.filters.is_empty() {
            ctx.presenter()
                .present_raw(&format!("  Filters: {}", asset_config.filters.join(", ")));
        }
        if !asset_config.columns.is_empty() {
            let names: Vec<&str> = asset_config
                .columns
                .iter()
                .map(|c| c.label.as_deref().unwrap_or(c.field.as_str()))
                .collect();
            ctx.presenter()
                .present_raw(&format!("  Columns: {}", names.join(", ")));
        }
        ctx.presenter().present_raw("");
    }
}
