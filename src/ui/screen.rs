use ratatui::Frame;

use crate::app::{App, Screen};
use crate::ui::{history::render_history, scoreboard::render_scoreboard, setup::render_setup};

/// A UI screen boundary: knows how to draw one [`Screen`]
pub trait ScreenView {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Game choice and player entry
pub struct SetupView;

impl ScreenView for SetupView {
    fn render(&self, app: &App, f: &mut Frame) {
        render_setup(app, f);
    }
}

/// Live scoreboard for the running session
pub struct ScoreboardView;

impl ScreenView for ScoreboardView {
    fn render(&self, app: &App, f: &mut Frame) {
        render_scoreboard(app, f);
    }
}

/// Past sessions
pub struct HistoryScreenView;

impl ScreenView for HistoryScreenView {
    fn render(&self, app: &App, f: &mut Frame) {
        render_history(app, f);
    }
}

/// Helper to construct the view for the current screen
pub fn current_screen(screen: Screen) -> Box<dyn ScreenView> {
    match screen {
        Screen::Setup => Box::new(SetupView),
        Screen::Game => Box::new(ScoreboardView),
        Screen::History => Box::new(HistoryScreenView),
    }
}
