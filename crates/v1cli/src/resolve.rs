//! Project and parent identifier resolution.

use v1cli_api::is_oid_token;
use v1cli_config::ProjectQueryConfig;
use v1cli_config::default_project_query_config;

use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;

/// True when the identifier is spelled like a project number (`E-nnn` or
/// bare digits).
pub fn looks_like_number(identifier: &str) -> bool {
    identifier.to_uppercase().starts_with("E-")
        || (!identifier.is_empty()
            && identifier.replace('-', "").chars().all(|c| c.is_ascii_digit()))
}

/// Resolves a project identifier to an OID.
///
/// Order: explicit OID token, bookmark lookup (index / number / OID /
/// name), API fetch for number-looking identifiers, then the default
/// project. Exits with a usage error when nothing matches.
pub fn project_oid(
    ctx: &mut HandlerContext,
    identifier: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(identifier) = identifier {
        if is_oid_token(identifier) {
            return Ok(identifier.to_string());
        }

        let settings = ctx.storage.settings()?;
        if let Some(bookmark) = settings.get_bookmark(identifier) {
            return Ok(bookmark.oid.clone());
        }

        if looks_like_number(identifier) {
            if let Some(project) = ctx.client()?.project_by_number(identifier)? {
                return Ok(project.oid);
            }
        }

        ctx.exit_not_found(
            &format!("Project not found: {identifier}"),
            Some("Use 'v1 projects add <number>' to bookmark a project."),
        );
    }

    if let Some(oid) = ctx.storage.default_project_oid() {
        return Ok(oid);
    }

    ctx.exit_usage(
        "No project specified and no default set.",
        Some("Use --project/-p or set a default with 'v1 projects default <number>'"),
    );
}

/// Resolves a project and returns its query configuration: the bookmark's
/// custom one when present, else the defaults.
pub fn project_with_config(
    ctx: &mut HandlerContext,
    identifier: Option<&str>,
) -> Result<(String, ProjectQueryConfig), Box<dyn std::error::Error>> {
    let oid = project_oid(ctx, identifier)?;

    let settings = ctx.storage.settings()?;
    let custom = settings
        .bookmarks
        .iter()
        .find(|b| b.oid == oid)
        .and_then(|b| b.query_config.as_ref())
        .filter(|config| config.is_configured())
        .cloned();

    Ok((oid, custom.unwrap_or_else(default_project_query_config)))
}

/// Resolves the story argument of task-ish commands: a bare row number
/// refers to the last `v1 stories` listing.
pub fn story_identifier(ctx: &HandlerContext, argument: &str) -> HandlerResult<String> {
    if !argument.is_empty() && argument.chars().all(|c| c.is_ascii_digit()) {
        let index: usize = argument.parse().unwrap_or(0);
        match ctx.storage.cached_story(index) {
            Some((number, _oid)) => return Ok(number),
            None => ctx.exit_not_found(
                &format!("No cached story at row {argument}. Run 'v1 stories' first."),
                None,
            ),
        }
    }
    Ok(argument.to_string())
}
