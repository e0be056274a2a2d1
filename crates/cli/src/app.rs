//! The terminal event loop.
//!
//! Owns the terminal for the lifetime of the menu: reads key and resize events,
//! advances the spinner, collects finished jobs, and carries out the effects the
//! menu asks for.

use std::io::stdout;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, ExecutableCommand};
use log::{debug, error, info};

use aws_control_core::error::Result;

use crate::jobs::{JobOutcome, JobRunner};
use crate::menu::render::draw;
use crate::menu::{AppContext, Effect, Menu};
use crate::spinner::TICK_RATE;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// Carries out one effect. Returns `false` once the application should exit.
fn apply_effect(effect: Effect, menu: &mut Menu, runner: &mut JobRunner) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return false,
        Effect::StartJob(request) => {
            debug!("Starting job: {request:?}");
            if let Err(e) = runner.launch(request) {
                error!("Could not start job: {e}");
                menu.job_finished(JobOutcome {
                    message: e.to_string(),
                    is_error: true,
                });
            }
        }
    }
    true
}

/// Runs the menu until the operator quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or written to.
pub fn run(mut ctx: AppContext, mut runner: JobRunner) -> Result<()> {
    let mut stdout = stdout();
    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;

    let _raw_mode_guard = RawModeGuard; // When this goes out of scope, raw mode is disabled

    let (width, height) = terminal::size()?;
    let mut menu = Menu::new(width, height);
    info!("Menu started, settings from `{}`", ctx.settings_path);

    let mut needs_redraw = true;

    loop {
        if let Some(event) = runner.poll() {
            menu.job_event(event);
            needs_redraw = true;
        }

        if needs_redraw {
            draw(&menu, &ctx)?;
            needs_redraw = false;
        }

        if !event::poll(TICK_RATE)? {
            if menu.is_spinning() {
                menu.tick();
                needs_redraw = true;
            }
            continue;
        }

        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                let effect = menu.handle_key(key_event, &mut ctx);
                if !apply_effect(effect, &mut menu, &mut runner) {
                    info!("Quit requested");
                    return Ok(());
                }
                needs_redraw = true;
            }
            Event::Resize(width, height) => {
                menu.resize(width, height);
                needs_redraw = true;
            }
            _ => {}
        }
    }
}
