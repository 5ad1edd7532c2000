//! Identity and setup commands.

use std::io::BufRead;
use std::io::Write;

use serde_json::json;

use v1cli_common::Colors;
use v1cli_config::StoryStatus;

use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;
use crate::table;

pub fn handle_me(ctx: &mut HandlerContext) -> HandlerResult {
    let member = ctx.client()?.me()?;
    ctx.storage.cache_member(&member.oid, &member.name)?;

    if ctx.is_json() {
        ctx.presenter().present_value(&serde_json::to_value(&member)?);
        return Ok(());
    }

    ctx.presenter()
        .present_raw(&format!("{} {}", Colors::success("Logged in as:"), member.name));
    ctx.presenter()
        .present_kv("Email", member.email.as_deref().unwrap_or("N/A"));
    ctx.presenter()
        .present_kv("Username", member.username.as_deref().unwrap_or("N/A"));
    ctx.presenter().present_kv("OID", &member.oid);
    ctx.presenter()
        .present_info("\nMember info cached to config.toml");
    Ok(())
}

pub fn handle_setup(ctx: &mut HandlerContext) -> HandlerResult {
    ctx.presenter().present_header("V1CLI Setup\n");

    ctx.presenter().present_raw("Connecting to VersionOne...");
    let member = ctx.client()?.me()?;
    let member_oid = member.oid.clone();
    let member_name = member.name.clone();
    ctx.storage.cache_member(&member_oid, &member_name)?;
    ctx.presenter().present_raw(&format!(
        "{} {} ({})",
        Colors::success("Found user:"),
        member_name,
        member_oid
    ));

    ctx.presenter().present_raw("\nDiscovering story statuses...");
    let statuses = ctx.client()?.story_statuses()?;
    if statuses.is_empty() {
        ctx.presenter()
            .present_raw(&Colors::warning("No story statuses found."));
        return Ok(());
    }

    ctx.presenter()
        .present_raw(&format!("Found {} statuses:\n", statuses.len()));
    for (i, status) in statuses.iter().enumerate() {
        ctx.presenter()
            .present_raw(&format!("  {}. {} ({})", i + 1, status.name, status.oid));
    }
    ctx.presenter().present_raw("");

    let mut settings = ctx.storage.settings()?;
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    for stage in StoryStatus::ALL {
        loop {
            print!("Map to {} [0 to skip]: ", stage.as_str().to_uppercase());
            std::io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => return Ok(()),
            };
            let choice: usize = match line.trim().parse() {
                Ok(n) => n,
                Err(_) if line.trim().is_empty() => 0,
                Err(_) => {
                    ctx.presenter().present_raw(&Colors::error(&format!(
                        "  Invalid choice. Enter 1-{} or 0 to skip.",
                        statuses.len()
                    )));
                    continue;
                }
            };

            if choice == 0 {
                ctx.presenter()
                    .present_info(&format!("  Skipped {}", stage.as_str().to_uppercase()));
                break;
            }
            if choice <= statuses.len() {
                let selected = &statuses[choice - 1];
                settings.status_mapping.set_oid(stage, selected.oid.clone());
                ctx.presenter().present_raw(&Colors::success(&format!(
                    "  {} → {}",
                    stage.as_str().to_uppercase(),
                    selected.name
                )));
                break;
            }
            ctx.presenter().present_raw(&Colors::error(&format!(
                "  Invalid choice. Enter 1-{} or 0 to skip.",
                statuses.len()
            )));
        }
    }

    ctx.storage.save(&settings)?;
    ctx.presenter().present_raw(&format!(
        "\n{}",
        Colors::success("Configuration saved to config.toml")
    ));
    Ok(())
}

pub fn handle_schema(
    ctx: &mut HandlerContext,
    asset_type: String,
    filter: Option<String>,
) -> HandlerResult {
    let result = ctx.client()?.asset_attributes(&asset_type);
    let mut attributes = match result {
        Ok(attributes) => attributes,
        Err(err) => {
            ctx.presenter()
                .present_error(&format!("Failed to get schema: {err}"));
            eprintln!(
                "{}",
                Colors::dim("Common asset types: Epic, Story, Task, Member, StoryStatus")
            );
            return Err(err.into());
        }
    };

    if let Some(filter) = filter {
        let needle = filter.to_lowercase();
        attributes.retain(|a| a.name.to_lowercase().contains(&needle));
    }

    if attributes.is_empty() {
        ctx.presenter()
            .present_raw(&Colors::warning("No attributes found."));
        return Ok(());
    }

    if ctx.is_json() {
        let value = serde_json::Value::Array(
            attributes
                .iter()
                .map(|a| {
                    json!({
                        "name": a.name,
                        "type": a.attribute_type,
                        "readonly": a.is_readonly,
                        "required": a.is_required,
                        "multi_value": a.is_multi_value,
                        "related_asset": a.related_asset,
                    })
                })
                .collect(),
        );
        ctx.presenter().present_value(&value);
        return Ok(());
    }

    let columns = vec![
        v1cli_config::ColumnConfig::new("Attribute").style("cyan"),
        v1cli_config::ColumnConfig::new("Type"),
        v1cli_config::ColumnConfig::new("Flags").style("dim"),
        v1cli_config::ColumnConfig::new("Related To").style("magenta"),
    ];
    let rows: Vec<Vec<String>> = attributes
        .iter()
        .map(|attr| {
            let mut flags = Vec::new();
            if attr.is_required {
                flags.push("required");
            }
            if attr.is_readonly {
                flags.push("readonly");
            }
            if attr.is_multi_value {
                flags.push("multi");
            }
            vec![
                attr.name.clone(),
                attr.attribute_type.clone(),
                if flags.is_empty() {
                    "-".to_string()
                } else {
                    flags.join(", ")
                },
                attr.related_asset.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    ctx.presenter().present_raw(&table::render_table(
        &format!("Schema for {asset_type}"),
        &columns,
        &rows,
    ));
    ctx.presenter()
        .present_info(&format!("Total: {} attributes", rows.len()));
    Ok(())
}
