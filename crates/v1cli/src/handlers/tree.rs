//! Hierarchy tree rendering.

use v1cli_api::Feature;
use v1cli_api::V1Client;
use v1cli_common::Colors;
use v1cli_config::Settings;

use crate::commands::TreeDepth;
use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;
use crate::resolve;

struct TreeOptions {
    depth: TreeDepth,
    include_done: bool,
    show_types: bool,
}

pub fn handle_tree(
    ctx: &mut HandlerContext,
    project: Option<String>,
    depth: TreeDepth,
    include_done: bool,
    show_types: bool,
) -> HandlerResult {
    let project_oid = resolve::project_oid(ctx, project.as_deref())?;
    let settings = ctx.storage.settings()?;
    let options = TreeOptions {
        depth,
        include_done,
        show_types,
    };

    let client = ctx.client()?;

    let project_name = client
        .project_by_oid(&project_oid)?
        .map(|p| p.name)
        .unwrap_or_else(|| project_oid.clone());

    let groups = client.delivery_groups(&project_oid, include_done)?;
    let direct_features = client.features_under(&project_oid, include_done)?;

    if groups.is_empty() && direct_features.is_empty() {
        println!("{}", Colors::warning("No items found under project."));
        return Ok(());
    }

    let mut root_label = Colors::bold(&Colors::info(&project_name));
    if options.show_types {
        root_label = format!("{} {}", Colors::dim("Scope:"), root_label);
    }
    println!("{root_label}");

    let mut lines: Vec<String> = Vec::new();

    for group in &groups {
        let mut label = format!(
            "{} {}",
            Colors::bold(&Colors::highlight(&group.number)),
            group.name
        );
        if options.show_types {
            let category = group
                .category
                .as_deref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default();
            label = format!("{} {}", Colors::dim(&format!("Epic{category}:")), label);
        }
        if let Some(status) = &group.status {
            label.push_str(&format!(" {}", Colors::dim(&format!("({status})"))));
        }
        lines.push(indent(1, &label));

        if matches!(
            options.depth,
            TreeDepth::Features | TreeDepth::Stories | TreeDepth::Tasks
        ) {
            let features = client.features_under(&group.oid, include_done)?;
            append_features(&mut lines, client, &settings, &features, &options, 2)?;
        }
    }

    append_features(&mut lines, client, &settings, &direct_features, &options, 1)?;

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn append_features(
    lines: &mut Vec<String>,
    client: &V1Client,
    settings: &Settings,
    features: &[Feature],
    options: &TreeOptions,
    level: usize,
) -> HandlerResult {
    for feature in features {
        let mut label = format!("{} {}", Colors::info(&feature.number), feature.name);
        if options.show_types {
            let category = feature
                .category
                .as_deref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default();
            label = format!("{} {}", Colors::dim(&format!("Epic{category}:")), label);
        }
        if let Some(status) = &feature.status {
            label.push_str(&format!(" {}", Colors::dim(&format!("({status})"))));
        }
        lines.push(indent(level, &label));

        if matches!(options.depth, TreeDepth::Stories | TreeDepth::Tasks) {
            for story in client.stories_under(&feature.oid, options.include_done)? {
                let stage = story
                    .status_oid
                    .as_deref()
                    .and_then(|oid| settings.status_mapping.status_for(oid));

                let mut label =
                    format!("{} {}", Colors::success(&story.number), story.name);
                if options.show_types {
                    label = format!("{} {}", Colors::dim("Story:"), label);
                }
                match stage {
                    Some(stage) => {
                        label.push_str(&format!(" {}", Colors::role(stage.color(), stage.icon())));
                    }
                    None => label.push_str(" ○"),
                }
                if let Some(estimate) = story.estimate {
                    label.push_str(&format!(
                        " {}",
                        Colors::dim(&format!("{}pts", estimate as i64))
                    ));
                }
                lines.push(indent(level + 1, &label));

                if options.depth == TreeDepth::Tasks {
                    for task in client.tasks_for(&story.oid)? {
                        let marker = if task.is_done() {
                            Colors::success("✓")
                        } else {
                            "[ ]".to_string()
                        };
                        let mut label = format!("{} {}", marker, task.name);
                        if !task.number.is_empty() {
                            label = format!("{} {}", Colors::dim(&task.number), label);
                        }
                        if options.show_types {
                            label = format!("{} {}", Colors::dim("Task:"), label);
                        }
                        lines.push(indent(level + 2, &label));
                    }
                }
            }
        }
    }
    Ok(())
}

fn indent(level: usize, label: &str) -> String {
    let guide = "│   ".repeat(level.saturating_sub(1));
    format!("{}{} {}", Colors::dim(&guide), Colors::dim("├──"), label)
}
