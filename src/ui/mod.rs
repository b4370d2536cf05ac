//! Presentation events and their renderers.
//!
//! The orchestrator never prints anything itself. It emits [`Event`]s into a
//! [`Presenter`] it owns for the whole session: [`TerminalPresenter`] renders
//! them with colors, a progress bar and tables, [`RecordingPresenter`] keeps
//! them in memory.

mod terminal;

pub use terminal::{TerminalPresenter, render_preview, render_summary};

use crate::types::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Header { title: String },
    Log { level: Level, message: String },
    ProgressStart { total: u64 },
    ProgressAdvance,
    ProgressFinish,
    Summary(Summary),
}

pub trait Presenter {
    fn handle(&mut self, event: Event);
}

/// Keeps every event, for library callers and tests.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<Event>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of all log events, in order.
    pub fn log_lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Log { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_level(&self, level: Level) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Log { level: l, .. } if *l == level))
            .count()
    }

    pub fn advances(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::ProgressAdvance))
            .count()
    }
}

impl Presenter for RecordingPresenter {
    fn handle(&mut self, event: Event) {
        self.events.push(event);
    }
}
