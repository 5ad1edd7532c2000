//! Command handlers.

mod features;
mod member;
mod projects;
mod stories;
mod tasks;
mod tree;

pub use features::handle_feature_create;
pub use features::handle_features;
pub use features::handle_roadmap;
pub use member::handle_me;
pub use member::handle_schema;
pub use member::handle_setup;
pub use projects::handle_projects_add;
pub use projects::handle_projects_all;
pub use projects::handle_projects_configure;
pub use projects::handle_projects_default;
pub use projects::handle_projects_list;
pub use projects::handle_projects_rm;
pub use stories::handle_mine;
pub use stories::handle_status;
pub use stories::handle_stories;
pub use stories::handle_story;
pub use stories::handle_story_create;
pub use stories::handle_take;
pub use tasks::handle_task_create;
pub use tasks::handle_task_done;
pub use tasks::handle_tasks;
pub use tree::handle_tree;

use v1cli_api::Story;
use v1cli_api::V1Client;
use v1cli_common::Colors;
use v1cli_config::Credentials;
use v1cli_config::Settings;
use v1cli_config::StoryStatus;

use crate::commands::OutputFormat;
use crate::presenter::Presenter;
use crate::presenter::create_presenter;
use crate::storage::LocalStorage;
use crate::table;

pub type HandlerResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct HandlerContext {
    pub storage: LocalStorage,
    pub format: OutputFormat,
    presenter: Box<dyn Presenter>,
    client: Option<V1Client>,
}

impl HandlerContext {
    pub fn new(storage: LocalStorage, format: OutputFormat) -> Self {
        let presenter = create_presenter(&format);
        Self {
            storage,
            format,
            presenter,
            client: None,
        }
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    /// The API client, connected on first use so offline commands
    /// (bookmark management) never require credentials.
    pub fn client(&mut self) -> HandlerResult<&V1Client> {
        if self.client.is_none() {
            let credentials = Credentials::from_env()?;
            self.client = Some(V1Client::new(credentials)?);
        }
        self.client
            .as_ref()
            .ok_or_else(|| "client unavailable".into())
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Presents an error and exits with EX_USAGE.
    pub fn exit_usage(&self, message: &str, hint: Option<&str>) -> ! {
        self.presenter.present_error(message);
        if let Some(hint) = hint {
            eprintln!("{}", Colors::dim(hint));
        }
        std::process::exit(64);
    }

    /// Presents an error and exits with EX_UNAVAILABLE.
    pub fn exit_not_found(&self, message: &str, hint: Option<&str>) -> ! {
        self.presenter.present_error(message);
        if let Some(hint) = hint {
            eprintln!("{}", Colors::dim(hint));
        }
        std::process::exit(69);
    }
}

/// Icon + colored status text for a story, via the configured mapping.
pub(crate) fn status_cell(story: &Story, settings: &Settings) -> String {
    let stage = story
        .status_oid
        .as_deref()
        .and_then(|oid| settings.status_mapping.status_for(oid));
    styled_status(stage, story.status_display())
}

pub(crate) fn styled_status(stage: Option<StoryStatus>, display: &str) -> String {
    match stage {
        Some(stage) => Colors::role(stage.color(), &format!("{} {}", stage.icon(), display)),
        None => format!("○ {display}"),
    }
}

/// Prints a story table and refreshes the row-number cache.
pub(crate) fn print_stories_table(
    ctx: &HandlerContext,
    stories: &[Story],
    title: &str,
) -> HandlerResult {
    let settings = ctx.storage.settings()?;

    let cached: Vec<(String, String)> = stories
        .iter()
        .map(|s| (s.number.clone(), s.oid.clone()))
        .collect();
    ctx.storage.cache_stories(&cached);

    let columns = vec![
        v1cli_config::ColumnConfig::new("#").justify(v1cli_config::Justify::Right),
        v1cli_config::ColumnConfig::new("Number").style("cyan"),
        v1cli_config::ColumnConfig::new("Status"),
        v1cli_config::ColumnConfig::new("Name"),
        v1cli_config::ColumnConfig::new("Pts").justify(v1cli_config::Justify::Right),
        v1cli_config::ColumnConfig::new("Project").style("dim"),
    ];

    let rows: Vec<Vec<String>> = stories
        .iter()
        .enumerate()
        .map(|(i, story)| {
            let points = story
                .estimate
                .map(|e| format!("{}", e as i64))
                .unwrap_or_else(|| "-".to_string());
            vec![
                format!("{}", i + 1),
                story.number.clone(),
                status_cell(story, &settings),
                table::truncate(&story.name, Some(50)),
                points,
                story.scope_name.clone(),
            ]
        })
        .collect();

    ctx.presenter()
        .present_raw(&table::render_table(title, &columns, &rows));
    ctx.presenter()
        .present_info(&format!("Total: {} stories", stories.len()));
    Ok(())
}

/// JSON output for a list of serializable models.
pub(crate) fn print_json<T: serde::Serialize>(ctx: &HandlerContext, items: &[T]) -> HandlerResult {
    let value = serde_json::to_value(items)?;
    ctx.presenter().present_value(&value);
    Ok(())
}
