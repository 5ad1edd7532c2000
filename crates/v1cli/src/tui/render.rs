//! Screen drawing.

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::Clear;
use crossterm::terminal::ClearType;

use v1cli_common::Colors;
use v1cli_config::StatusMapping;
use v1cli_config::StoryStatus;

use super::app::App;
use super::app::Screen;

pub fn draw(app: &App, mapping: &StatusMapping) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    let (title, hints) = match app.screens.last() {
        Some(Screen::Dashboard { .. }) => (
            "MY STORIES",
            "↑/↓ select  enter view  s status  t tasks  p projects  r refresh  q quit",
        ),
        Some(Screen::Projects { .. }) => (
            "PROJECTS",
            "↑/↓ select  b bookmark  d default  r refresh  esc back",
        ),
        Some(Screen::StoryDetail { .. }) => ("STORY", "s status  t tasks  r refresh  esc back"),
        Some(Screen::Tasks { .. }) => ("TASKS", "↑/↓ select  d mark done  r refresh  esc back"),
        Some(Screen::StatusMenu { .. }) => ("CHANGE STATUS", "↑/↓ select  enter apply  esc cancel"),
        None => ("", ""),
    };

    let header = format!("{}  {}", Colors::bold("v1"), Colors::dim(title));
    queue!(stdout, Print(header), MoveTo(0, 1))?;
    queue!(
        stdout,
        Print(Colors::dim(&"─".repeat(cols as usize))),
        MoveTo(0, 2)
    )?;

    let body_rows = rows.saturating_sub(4);
    match app.screens.last() {
        Some(Screen::Dashboard { stories, selected }) => {
            for (i, story) in stories.iter().take(body_rows as usize).enumerate() {
                let stage = story
                    .status_oid
                    .as_deref()
                    .and_then(|oid| mapping.status_for(oid));
                let status = styled_stage(stage, story.status_display());
                let points = story
                    .estimate
                    .map(|e| format!("{}pts", e as i64))
                    .unwrap_or_default();
                let line = format!(
                    "{} {}  {}  {} {} {}",
                    cursor(i == *selected),
                    Colors::info(&story.number),
                    status,
                    clip(&story.name, 50),
                    Colors::dim(&points),
                    Colors::dim(&story.scope_name),
                );
                queue!(stdout, Print(line), MoveTo(0, 3 + i as u16))?;
            }
            if stories.is_empty() {
                queue!(
                    stdout,
                    Print(Colors::dim("No stories assigned to you.")),
                    MoveTo(0, 3)
                )?;
            }
        }

        Some(Screen::Projects { projects, selected }) => {
            for (i, project) in projects.iter().take(body_rows as usize).enumerate() {
                let line = format!(
                    "{} {}  {}  {}",
                    cursor(i == *selected),
                    Colors::info(&project.number),
                    clip(&project.name, 60),
                    Colors::dim(project.status.as_deref().unwrap_or("-")),
                );
                queue!(stdout, Print(line), MoveTo(0, 3 + i as u16))?;
            }
        }

        Some(Screen::StoryDetail { story, tasks }) => {
            let stage = story
                .status_oid
                .as_deref()
                .and_then(|oid| mapping.status_for(oid));
            let mut line_no: u16 = 2;
            let mut put = |stdout: &mut std::io::Stdout, text: String| -> std::io::Result<()> {
                queue!(stdout, Print(text), MoveTo(0, line_no + 1))?;
                line_no += 1;
                Ok(())
            };

            put(
                &mut stdout,
                format!(
                    "{} {}",
                    Colors::bold(&format!("{}:", story.number)),
                    story.name
                ),
            )?;
            put(&mut stdout, styled_stage(stage, story.status_display()))?;
            put(&mut stdout, String::new())?;
            put(
                &mut stdout,
                format!("{} {}", Colors::dim("Project:"), story.scope_name),
            )?;
            if let Some(parent) = &story.parent_name {
                put(&mut stdout, format!("{} {}", Colors::dim("Feature:"), parent))?;
            }
            let owners = if story.owners.is_empty() {
                "None".to_string()
            } else {
                story.owners.join(", ")
            };
            put(&mut stdout, format!("{} {}", Colors::dim("Owners:"), owners))?;
            if let Some(estimate) = story.estimate {
                put(
                    &mut stdout,
                    format!("{} {} pts", Colors::dim("Estimate:"), estimate),
                )?;
            }
            put(&mut stdout, String::new())?;
            if !story.description.is_empty() {
                put(&mut stdout, Colors::bold("DESCRIPTION").to_string())?;
                for desc_line in story.description.lines().take(6) {
                    put(&mut stdout, clip(desc_line, cols as usize - 1))?;
                }
                put(&mut stdout, String::new())?;
            }
            put(&mut stdout, Colors::bold(&format!("TASKS ({})", tasks.len())))?;
            for task in tasks.iter().take(8) {
                let marker = if task.is_done() {
                    Colors::success("[x]")
                } else {
                    "[ ]".to_string()
                };
                put(&mut stdout, format!("  {} {}", marker, clip(&task.name, 60)))?;
            }
        }

        Some(Screen::Tasks {
            story,
            tasks,
            selected,
        }) => {
            queue!(
                stdout,
                Print(Colors::bold(&format!(
                    "Tasks for {}: {}",
                    story.number,
                    clip(&story.name, 50)
                ))),
                MoveTo(0, 3)
            )?;
            for (i, task) in tasks
                .iter()
                .take((body_rows as usize).saturating_sub(1))
                .enumerate()
            {
                let marker = if task.is_done() {
                    Colors::success("[x]")
                } else {
                    "[ ]".to_string()
                };
                let hours = format!(
                    "{}h done, {}h todo",
                    task.done.unwrap_or(0.0),
                    task.todo.unwrap_or(0.0)
                );
                let owners = if task.owners.is_empty() {
                    "-".to_string()
                } else {
                    task.owners.join(", ")
                };
                let line = format!(
                    "{} {} {}  {}  {}",
                    cursor(i == *selected),
                    marker,
                    clip(&task.name, 40),
                    Colors::dim(&hours),
                    Colors::dim(&owners),
                );
                queue!(stdout, Print(line), MoveTo(0, 4 + i as u16))?;
            }
        }

        Some(Screen::StatusMenu {
            story,
            current,
            options,
            selected,
        }) => {
            queue!(
                stdout,
                Print(Colors::bold(&format!("Change Status: {}", story.number))),
                MoveTo(0, 3)
            )?;
            let current_text = match current {
                Some(stage) => styled_stage(Some(*stage), stage.as_str()),
                None => "○ Unknown".to_string(),
            };
            queue!(
                stdout,
                Print(format!("Current: {current_text}")),
                MoveTo(0, 5)
            )?;
            if options.is_empty() {
                queue!(
                    stdout,
                    Print(Colors::dim("No valid transitions from current status")),
                    MoveTo(0, 6)
                )?;
            } else {
                queue!(stdout, Print("Move to:"), MoveTo(0, 6))?;
                for (i, option) in options.iter().enumerate() {
                    let line = format!(
                        "{} {}",
                        cursor(i == *selected),
                        styled_stage(Some(*option), option.as_str()),
                    );
                    queue!(stdout, Print(line), MoveTo(0, 7 + i as u16))?;
                }
            }
        }

        None => {}
    }

    // Footer: key hints above the status bar.
    queue!(
        stdout,
        MoveTo(0, rows.saturating_sub(2)),
        Print(Colors::dim(hints)),
        MoveTo(0, rows.saturating_sub(1)),
        Print(&app.status_line),
    )?;

    stdout.flush()
}

fn cursor(selected: bool) -> String {
    if selected {
        Colors::bold("›")
    } else {
        " ".to_string()
    }
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn styled_stage(stage: Option<StoryStatus>, display: &str) -> String {
    match stage {
        Some(stage) => Colors::role(stage.color(), &format!("{} {}", stage.icon(), display)),
        None => format!("○ {display}"),
    }
}
