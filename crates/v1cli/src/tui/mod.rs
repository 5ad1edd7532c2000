//! Interactive terminal dashboard.
//!
//! A raw-mode, alternate-screen event loop over a stack of screens:
//! dashboard (my stories), projects browser, story detail, tasks and a
//! status-change menu. Fetch and update failures land in the status bar;
//! the loop itself never bails on them.

mod app;
mod render;

use std::io::Write;
use std::time::Duration;

use crossterm::event;
use crossterm::event::Event;
use crossterm::execute;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;

use crate::handlers::HandlerContext;
use crate::handlers::HandlerResult;

use app::App;

/// RAII guard that restores the terminal on every exit path.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        enable_raw_mode()?;
        execute!(std::io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        let _ = std::io::stdout().flush();
    }
}

pub fn run(ctx: &mut HandlerContext) -> HandlerResult {
    // Fail fast on missing credentials before taking over the terminal.
    ctx.client()?;

    let mapping = ctx.storage.settings()?.status_mapping;

    let mut app = App::new();
    app.reload_current(ctx);

    let _guard = TerminalGuard::enter()?;

    loop {
        render::draw(&app, &mapping)?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if !app.handle_key(ctx, key) {
                    break;
                }
            }
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    Ok(())
}
