use ratatui::{layout::Rect, Frame};

use pitchr::session::PitchState;

use crate::App;

/// A UI Screen boundary: one per session state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
}

pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, _app: &App, f: &mut Frame, area: Rect) {
        super::render_idle(f, area);
    }
}

pub struct RecordingScreen;

impl Screen for RecordingScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        super::render_recording(app, f, area);
    }
}

/// Spinner text, plus the retry prompt when the last analysis was rejected
pub struct ProcessingScreen;

impl Screen for ProcessingScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        super::render_processing(app, f, area);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        super::render_results(app, f, area);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: PitchState) -> Box<dyn Screen> {
    match state {
        PitchState::Idle => Box::new(IdleScreen),
        PitchState::Recording => Box::new(RecordingScreen),
        PitchState::Processing => Box::new(ProcessingScreen),
        PitchState::Results => Box::new(ResultsScreen),
    }
}
