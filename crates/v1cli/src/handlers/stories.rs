//! Story commands.

use v1cli_api::Story;
use v1cli_api::is_oid_token;
use v1cli_common::Colors;
use v1cli_config::StoryStatus;

use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;
use crate::handlers::print_json;
use crate::handlers::print_stories_table;
use crate::handlers::styled_status;
use crate::resolve;

pub fn handle_mine(ctx: &mut HandlerContext, include_done: bool) -> HandlerResult {
    let project_oids = ctx.storage.bookmarked_project_oids();
    let scope = if project_oids.is_empty() {
        None
    } else {
        Some(project_oids.as_slice())
    };

    let stories = ctx.client()?.my_stories(scope, include_done)?;

    if stories.is_empty() {
        if ctx.is_json() {
            ctx.presenter().present_raw("[]");
        } else {
            ctx.presenter()
                .present_raw(&Colors::warning("No stories assigned to you."));
        }
        return Ok(());
    }

    if ctx.is_json() {
        return print_json(ctx, &stories);
    }
    print_stories_table(ctx, &stories, "My Stories")
}

pub fn handle_stories(
    ctx: &mut HandlerContext,
    parent: Option<String>,
    project: Option<String>,
    include_done: bool,
) -> HandlerResult {
    let (stories, title) = match parent {
        Some(parent) => stories_under_parent(ctx, &parent, include_done)?,
        None => {
            // Whole project: every feature directly under the project and
            // under each delivery group, then the stories under those.
            let project_oid = resolve::project_oid(ctx, project.as_deref())?;
            let client = ctx.client()?;

            let mut features = client.features_under(&project_oid, include_done)?;
            for group in client.delivery_groups(&project_oid, include_done)? {
                features.extend(client.features_under(&group.oid, include_done)?);
            }

            let mut stories = Vec::new();
            for feature in &features {
                stories.extend(client.stories_under(&feature.oid, include_done)?);
            }
            (stories, "All Stories".to_string())
        }
    };

    if stories.is_empty() {
        if ctx.is_json() {
            ctx.presenter().present_raw("[]");
        } else {
            ctx.presenter()
                .present_raw(&Colors::warning("No stories found."));
        }
        return Ok(());
    }

    if ctx.is_json() {
        return print_json(ctx, &stories);
    }
    print_stories_table(ctx, &stories, &title)
}

fn stories_under_parent(
    ctx: &mut HandlerContext,
    parent: &str,
    include_done: bool,
) -> HandlerResult<(Vec<Story>, String)> {
    // A bare row number refers to the last `v1 features` listing.
    if parent.chars().all(|c| c.is_ascii_digit()) {
        let index: usize = parent.parse().unwrap_or(0);
        let Some((feature_number, _oid)) = ctx.storage.cached_feature(index) else {
            ctx.exit_not_found(
                &format!("No cached feature at row {parent}. Run 'v1 features' first."),
                None,
            );
        };
        let Some(feature) = ctx.client()?.feature_by_number(&feature_number)? else {
            ctx.exit_not_found(&format!("Cached feature not found: {feature_number}"), None);
        };
        let stories = ctx.client()?.stories_under(&feature.oid, include_done)?;
        return Ok((
            stories,
            format!("Stories under {}: {}", feature.number, feature.name),
        ));
    }

    let is_feature = parent.to_uppercase().starts_with("E-")
        || (is_oid_token(parent) && parent.to_lowercase().starts_with("epic:"));

    if is_feature {
        let Some(feature) = ctx.client()?.feature_by_number(parent)? else {
            ctx.exit_not_found(&format!("Feature not found: {parent}"), None);
        };
        let stories = ctx.client()?.stories_under(&feature.oid, include_done)?;
        return Ok((
            stories,
            format!("Stories under {}: {}", feature.number, feature.name),
        ));
    }

    let Some(story) = ctx.client()?.story_by_number(parent)? else {
        ctx.exit_not_found(&format!("Story not found: {parent}"), None);
    };
    let stories = ctx.client()?.stories_under(&story.oid, include_done)?;
    Ok((
        stories,
        format!("Stories under {}: {}", story.number, story.name),
    ))
}

pub fn handle_story(ctx: &mut HandlerContext, number: String) -> HandlerResult {
    let Some(story) = ctx.client()?.story_by_number(&number)? else {
        ctx.exit_not_found(&format!("Story not found: {number}"), None);
    };

    let tasks = ctx.client()?.tasks_for(&story.oid)?;

    if ctx.is_json() {
        let mut value = serde_json::to_value(&story)?;
        value["tasks"] = serde_json::to_value(&tasks)?;
        ctx.presenter().present_value(&value);
        return Ok(());
    }

    let settings = ctx.storage.settings()?;
    let stage = story
        .status_oid
        .as_deref()
        .and_then(|oid| settings.status_mapping.status_for(oid));

    ctx.presenter().present_raw(&format!(
        "\n{} {}",
        Colors::bold(&format!("{}:", story.number)),
        story.name
    ));
    ctx.presenter()
        .present_raw(&styled_status(stage, story.status_display()));
    ctx.presenter().present_raw("");
    ctx.presenter().present_kv("Project", &story.scope_name);
    if let Some(parent) = &story.parent_name {
        ctx.presenter().present_kv("Feature", parent);
    }
    let owners = if story.owners.is_empty() {
        "None".to_string()
    } else {
        story.owners.join(", ")
    };
    ctx.presenter().present_kv("Owners", &owners);
    if let Some(estimate) = story.estimate {
        ctx.presenter()
            .present_kv("Estimate", &format!("{estimate} pts"));
    }
    ctx.presenter().present_kv("OID", &story.oid);

    if !story.description.is_empty() {
        ctx.presenter().present_raw("");
        ctx.presenter().present_header("DESCRIPTION");
        let truncated: String = story.description.chars().take(500).collect();
        ctx.presenter().present_raw(&truncated);
        if story.description.chars().count() > 500 {
            ctx.presenter().present_info("...(truncated)");
        }
    }

    if !tasks.is_empty() {
        ctx.presenter().present_raw("");
        ctx.presenter()
            .present_header(&format!("TASKS ({})", tasks.len()));
        for task in &tasks {
            let marker = if task.is_done() { "[x]" } else { "[ ]" };
            let hours = if task.todo.is_some() || task.done.is_some() {
                format!(
                    " ({}h done, {}h todo)",
                    task.done.unwrap_or(0.0),
                    task.todo.unwrap_or(0.0)
                )
            } else {
                String::new()
            };
            ctx.presenter()
                .present_raw(&format!("  {} {}{}", marker, task.name, hours));
        }
    }
    Ok(())
}

pub fn handle_status(ctx: &mut HandlerContext, number: String, stage: String) -> HandlerResult {
    let settings = ctx.storage.settings()?;
    if !settings.status_mapping.is_configured() {
        ctx.exit_usage(
            "Status mapping not configured.",
            Some("Run 'v1 setup' first to map your V1 statuses."),
        );
    }

    let target: StoryStatus = match stage.parse() {
        Ok(target) => target,
        Err(_) => ctx.exit_usage(
            &format!("Invalid status: {stage}"),
            Some("Valid statuses: backlog, ready, progress, review, done"),
        ),
    };

    let Some(status_oid) = settings.status_mapping.oid_for(target).map(str::to_string) else {
        ctx.exit_usage(
            &format!("Status not mapped: {target}"),
            Some("Run 'v1 setup' to configure this status."),
        );
    };

    let Some(story) = ctx.client()?.story_by_number(&number)? else {
        ctx.exit_not_found(&format!("Story not found: {number}"), None);
    };

    ctx.client()?.set_story_status(&story.oid, &status_oid)?;

    ctx.presenter().present_raw(&format!(
        "{} {}",
        Colors::success(&format!("Updated {}:", story.number)),
        styled_status(Some(target), target.as_str())
    ));
    Ok(())
}

pub fn handle_take(ctx: &mut HandlerContext, number: String) -> HandlerResult {
    let Some(member_oid) = ctx.storage.cached_member_oid() else {
        ctx.exit_usage("Member OID not cached.", Some("Run 'v1 me' first."));
    };

    let Some(story) = ctx.client()?.story_by_number(&number)? else {
        ctx.exit_not_found(&format!("Story not found: {number}"), None);
    };

    ctx.client()?.assign_story(&story.oid, &member_oid)?;
    ctx.presenter().present_raw(&Colors::success(&format!(
        "Assigned {} to you",
        story.number
    )));
    Ok(())
}

pub fn handle_story_create(
    ctx: &mut HandlerContext,
    name: String,
    project: Option<String>,
    feature: Option<String>,
    estimate: Option<f64>,
    description: String,
) -> HandlerResult {
    let project_oid = resolve::project_oid(ctx, project.as_deref())?;

    let feature_oid = match &feature {
        Some(feature_number) => {
            let Some(feature) = ctx.client()?.feature_by_number(feature_number)? else {
                ctx.exit_not_found(&format!("Feature not found: {feature_number}"), None);
            };
            Some(feature.oid)
        }
        None => None,
    };

    let oid = ctx.client()?.create_story(
        &name,
        &project_oid,
        feature_oid.as_deref(),
        estimate,
        &description,
    )?;

    ctx.presenter()
        .present_raw(&format!("{} {}", Colors::success("Created story:"), oid));
    ctx.presenter().present_kv("Name", &name);
    if let Some(feature) = &feature {
        ctx.presenter().present_kv("Feature", feature);
    }
    if let Some(estimate) = estimate {
        ctx.presenter()
            .present_kv("Estimate", &format!("{estimate} pts"));
    }
    Ok(())
}
