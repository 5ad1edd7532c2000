//! Task commands.

use v1cli_common::Colors;

use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;
use crate::handlers::print_json;
use crate::resolve;

pub fn handle_tasks(ctx: &mut HandlerContext, story_argument: String) -> HandlerResult {
    let identifier = resolve::story_identifier(ctx, &story_argument)?;

    let Some(story) = ctx.client()?.story_by_number(&identifier)? else {
        ctx.exit_not_found(&format!("Story not found: {story_argument}"), None);
    };

    let tasks = ctx.client()?.tasks_for(&story.oid)?;

    if tasks.is_empty() {
        if ctx.is_json() {
            ctx.presenter().present_raw("[]");
        } else {
            ctx.presenter().present_raw(&Colors::warning(&format!(
                "No tasks for {story_argument}"
            )));
        }
        return Ok(());
    }

    if ctx.is_json() {
        return print_json(ctx, &tasks);
    }

    ctx.presenter()
        .present_header(&format!("Tasks for {}: {}\n", story.number, story.name));

    for task in &tasks {
        let marker = if task.is_done() {
            Colors::success("✓")
        } else {
            "[ ]".to_string()
        };
        let number = if task.number.is_empty() {
            String::new()
        } else {
            format!("{} ", Colors::info(&task.number))
        };
        let hours = if task.todo.is_some() || task.done.is_some() {
            Colors::dim(&format!(
                " ({}h done, {}h todo)",
                task.done.unwrap_or(0.0),
                task.todo.unwrap_or(0.0)
            ))
        } else {
            String::new()
        };
        let owners = if task.owners.is_empty() {
            String::new()
        } else {
            Colors::dim(&format!(" ({})", task.owners.join(", ")))
        };
        ctx.presenter().present_raw(&format!(
            "  {} {}{}{}{}",
            marker, number, task.name, hours, owners
        ));
    }
    Ok(())
}

pub fn handle_task_create(
    ctx: &mut HandlerContext,
    story_argument: String,
    name: String,
    estimate_hours: Option<f64>,
) -> HandlerResult {
    let identifier = resolve::story_identifier(ctx, &story_argument)?;

    let Some(story) = ctx.client()?.story_by_number(&identifier)? else {
        ctx.exit_not_found(&format!("Story not found: {story_argument}"), None);
    };

    let oid = ctx.client()?.create_task(&name, &story.oid, estimate_hours)?;

    ctx.presenter()
        .present_raw(&format!("{} {}", Colors::success("Created task:"), oid));
    ctx.presenter().present_kv("Name", &name);
    ctx.presenter().present_kv("Story", &story.number);
    if let Some(hours) = estimate_hours {
        ctx.presenter().present_kv("Estimate", &format!("{hours}h"));
    }
    Ok(())
}

pub fn handle_task_done(ctx: &mut HandlerContext, identifier: String) -> HandlerResult {
    let Some(task) = ctx.client()?.task_by_identifier(&identifier)? else {
        ctx.exit_not_found(&format!("Task not found: {identifier}"), None);
    };

    ctx.client()?.complete_task(&task.oid)?;

    let display = if task.number.is_empty() {
        task.oid.clone()
    } else {
        task.number.clone()
    };
    ctx.presenter().present_raw(&format!(
        "{} {} - {}",
        Colors::success("Marked task as done:"),
        display,
        task.name
    ));
    Ok(())
}
