//! Dashboard state and key handling.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;

use v1cli_api::Project;
use v1cli_api::Story;
use v1cli_api::Task;
use v1cli_config::StoryStatus;
use v1cli_config::valid_transitions;

use crate::handlers::HandlerContext;

pub enum Screen {
    Dashboard {
        stories: Vec<Story>,
        selected: usize,
    },
    Projects {
        projects: Vec<Project>,
        selected: usize,
    },
    StoryDetail {
        story: Box<Story>,
        tasks: Vec<Task>,
    },
    Tasks {
        story: Box<Story>,
        tasks: Vec<Task>,
        selected: usize,
    },
    StatusMenu {
        story: Box<Story>,
        current: Option<StoryStatus>,
        options: Vec<StoryStatus>,
        selected: usize,
    },
}

/// Deferred effect of a key press. Selection moves happen in place; every
/// mutation that needs the whole app (stack pushes, API calls) goes
/// through here.
enum Action {
    None,
    Quit,
    Pop,
    Reload,
    PushProjects,
    PushDetail(Story),
    PushTasks(Story),
    PushStatusMenu(Story),
    Notify(String),
    ToggleBookmark(Project),
    SetDefault(Project),
    CompleteTask(Task),
    ApplyStatus(String, StoryStatus),
}

pub struct App {
    pub screens: Vec<Screen>,
    pub status_line: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            screens: vec![Screen::Dashboard {
                stories: Vec::new(),
                selected: 0,
            }],
            status_line: String::new(),
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.status_line = message.into();
    }

    /// Refetches the data behind the top screen.
    pub fn reload_current(&mut self, ctx: &mut HandlerContext) {
        let result = match self.screens.last_mut() {
            Some(Screen::Dashboard { stories, selected }) => match load_my_stories(ctx) {
                Ok(fresh) => {
                    *selected = (*selected).min(fresh.len().saturating_sub(1));
                    let count = fresh.len();
                    *stories = fresh;
                    Ok(format!("{count} stories"))
                }
                Err(err) => Err(err),
            },
            Some(Screen::Projects { projects, selected }) => {
                match ctx.client().and_then(|c| Ok(c.projects(false)?)) {
                    Ok(fresh) => {
                        *selected = (*selected).min(fresh.len().saturating_sub(1));
                        let count = fresh.len();
                        *projects = fresh;
                        Ok(format!("{count} projects"))
                    }
                    Err(err) => Err(err),
                }
            }
            Some(Screen::StoryDetail { story, tasks })
            | Some(Screen::Tasks { story, tasks, .. }) => {
                let oid = story.oid.clone();
                match ctx.client().and_then(|c| Ok(c.tasks_for(&oid)?)) {
                    Ok(fresh) => {
                        let count = fresh.len();
                        *tasks = fresh;
                        Ok(format!("{count} tasks"))
                    }
                    Err(err) => Err(err),
                }
            }
            _ => Ok(String::new()),
        };

        match result {
            Ok(message) => self.notify(message),
            Err(err) => self.notify(format!("Error: {err}")),
        }
    }

    /// Handles one key event; returns false to quit.
    pub fn handle_key(&mut self, ctx: &mut HandlerContext, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        let action = self.action_for(key);
        self.perform(ctx, action)
    }

    fn action_for(&mut self, key: KeyEvent) -> Action {
        match self.screens.last_mut() {
            Some(Screen::Dashboard { stories, selected }) => match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Up | KeyCode::Char('k') => {
                    *selected = selected.saturating_sub(1);
                    Action::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected + 1 < stories.len() {
                        *selected += 1;
                    }
                    Action::None
                }
                KeyCode::Char('r') => Action::Reload,
                KeyCode::Char('p') => Action::PushProjects,
                KeyCode::Enter => match stories.get(*selected) {
                    Some(story) => Action::PushDetail(story.clone()),
                    None => Action::None,
                },
                KeyCode::Char('t') => match stories.get(*selected) {
                    Some(story) => Action::PushTasks(story.clone()),
                    None => Action::None,
                },
                KeyCode::Char('s') => match stories.get(*selected) {
                    Some(story) => Action::PushStatusMenu(story.clone()),
                    None => Action::None,
                },
                _ => Action::None,
            },

            Some(Screen::Projects { projects, selected }) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::Pop,
                KeyCode::Up | KeyCode::Char('k') => {
                    *selected = selected.saturating_sub(1);
                    Action::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected + 1 < projects.len() {
                        *selected += 1;
                    }
                    Action::None
                }
                KeyCode::Char('r') => Action::Reload,
                KeyCode::Char('b') => match projects.get(*selected) {
                    Some(project) => Action::ToggleBookmark(project.clone()),
                    None => Action::None,
                },
                KeyCode::Char('d') => match projects.get(*selected) {
                    Some(project) => Action::SetDefault(project.clone()),
                    None => Action::None,
                },
                KeyCode::Enter => match projects.get(*selected) {
                    Some(project) => {
                        Action::Notify(format!("Use CLI: v1 stories -p '{}'", project.name))
                    }
                    None => Action::None,
                },
                _ => Action::None,
            },

            Some(Screen::StoryDetail { story, .. }) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::Pop,
                KeyCode::Char('t') => Action::PushTasks((**story).clone()),
                KeyCode::Char('s') => Action::PushStatusMenu((**story).clone()),
                KeyCode::Char('r') => Action::Reload,
                _ => Action::None,
            },

            Some(Screen::Tasks {
                tasks, selected, ..
            }) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::Pop,
                KeyCode::Up | KeyCode::Char('k') => {
                    *selected = selected.saturating_sub(1);
                    Action::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected + 1 < tasks.len() {
                        *selected += 1;
                    }
                    Action::None
                }
                KeyCode::Char('r') => Action::Reload,
                KeyCode::Char('d') => match tasks.get(*selected) {
                    Some(task) => Action::CompleteTask(task.clone()),
                    None => Action::None,
                },
                _ => Action::None,
            },

            Some(Screen::StatusMenu {
                story,
                options,
                selected,
                ..
            }) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::Pop,
                KeyCode::Up | KeyCode::Char('k') => {
                    *selected = selected.saturating_sub(1);
                    Action::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected + 1 < options.len() {
                        *selected += 1;
                    }
                    Action::None
                }
                KeyCode::Enter => match options.get(*selected) {
                    Some(target) => Action::ApplyStatus(story.oid.clone(), *target),
                    None => Action::None,
                },
                _ => Action::None,
            },

            None => Action::Quit,
        }
    }

    fn perform(&mut self, ctx: &mut HandlerContext, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::None => {}
            Action::Pop => {
                self.screens.pop();
            }
            Action::Reload => self.reload_current(ctx),
            Action::PushProjects => {
                self.screens.push(Screen::Projects {
                    projects: Vec::new(),
                    selected: 0,
                });
                self.reload_current(ctx);
            }
            Action::PushDetail(story) => {
                self.screens.push(Screen::StoryDetail {
                    story: Box::new(story),
                    tasks: Vec::new(),
                });
                self.reload_current(ctx);
            }
            Action::PushTasks(story) => {
                self.screens.push(Screen::Tasks {
                    story: Box::new(story),
                    tasks: Vec::new(),
                    selected: 0,
                });
                self.reload_current(ctx);
            }
            Action::PushStatusMenu(story) => self.push_status_menu(ctx, story),
            Action::Notify(message) => self.notify(message),
            Action::ToggleBookmark(project) => self.toggle_bookmark(ctx, &project),
            Action::SetDefault(project) => self.set_default(ctx, &project),
            Action::CompleteTask(task) => self.complete_task(ctx, &task),
            Action::ApplyStatus(story_oid, target) => self.apply_status(ctx, &story_oid, target),
        }
        true
    }

    fn push_status_menu(&mut self, ctx: &mut HandlerContext, story: Story) {
        let mapping = match ctx.storage.settings() {
            Ok(settings) => settings.status_mapping,
            Err(err) => {
                self.notify(format!("Error: {err}"));
                return;
            }
        };
        let current = story
            .status_oid
            .as_deref()
            .and_then(|oid| mapping.status_for(oid));
        let options: Vec<StoryStatus> = current
            .map(|stage| valid_transitions(stage).to_vec())
            .unwrap_or_default();

        self.screens.push(Screen::StatusMenu {
            story: Box::new(story),
            current,
            options,
            selected: 0,
        });
    }

    fn apply_status(&mut self, ctx: &mut HandlerContext, story_oid: &str, target: StoryStatus) {
        let mapping = match ctx.storage.settings() {
            Ok(settings) => settings.status_mapping,
            Err(err) => {
                self.notify(format!("Error: {err}"));
                return;
            }
        };
        let Some(status_oid) = mapping.oid_for(target).map(str::to_string) else {
            self.notify(format!("Status {target} not configured"));
            return;
        };

        let result = ctx
            .client()
            .and_then(|c| Ok(c.set_story_status(story_oid, &status_oid)?));
        match result {
            Ok(()) => {
                self.screens.pop();
                self.reload_current(ctx);
                self.notify(format!("Updated to {target}"));
            }
            Err(err) => self.notify(format!("Error: {err}")),
        }
    }

    fn toggle_bookmark(&mut self, ctx: &mut HandlerContext, project: &Project) {
        let bookmarked = ctx
            .storage
            .bookmarked_project_oids()
            .contains(&project.oid);
        let result = if bookmarked {
            ctx.storage
                .remove_project_bookmark(&project.oid)
                .map(|_| format!("Removed bookmark: {}", project.name))
        } else {
            ctx.storage
                .add_project_bookmark(&project.name, &project.oid)
                .map(|_| format!("Bookmarked: {}", project.name))
        };
        match result {
            Ok(message) => self.notify(message),
            Err(err) => self.notify(format!("Error: {err}")),
        }
    }

    fn set_default(&mut self, ctx: &mut HandlerContext, project: &Project) {
        let bookmarked = ctx
            .storage
            .bookmarked_project_oids()
            .contains(&project.oid);
        let result = (|| {
            if !bookmarked {
                ctx.storage
                    .add_project_bookmark(&project.name, &project.oid)?;
            }
            ctx.storage.set_default_project(&project.oid)
        })();
        match result {
            Ok(()) => self.notify(format!("Default project: {}", project.name)),
            Err(err) => self.notify(format!("Error: {err}")),
        }
    }

    fn complete_task(&mut self, ctx: &mut HandlerContext, task: &Task) {
        let result = ctx
            .client()
            .and_then(|c| Ok(c.complete_task(&task.oid)?));
        match result {
            Ok(()) => {
                self.notify(format!("Marked done: {}", task.name));
                self.reload_current(ctx);
            }
            Err(err) => self.notify(format!("Error: {err}")),
        }
    }
}

fn load_my_stories(ctx: &mut HandlerContext) -> Result<Vec<Story>, Box<dyn std::error::Error>> {
    let project_oids = ctx.storage.bookmarked_project_oids();
    let scope = if project_oids.is_empty() {
        None
    } else {
        Some(project_oids.as_slice())
    };
    Ok(ctx.client()?.my_stories(scope, false)?)
}
