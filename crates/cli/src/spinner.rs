//! Busy indicator shown while a background job runs.

use std::time::Duration;

/// How often the event loop advances the spinner when no input arrives.
pub const TICK_RATE: Duration = Duration::from_millis(120);

const PULSE: [&str; 4] = ["█", "▓", "▒", "░"];

#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % PULSE.len();
    }

    pub fn frame(&self) -> &'static str {
        PULSE[self.frame]
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }
}
