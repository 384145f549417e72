use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::celebration::Celebration;
use crate::config::{Config, ConfigStore};
use crate::contention::Verdict;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::history::{HistoryDb, HistoryRecord};
use crate::runtime::AppEvent;
use crate::session::{parse_points, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Screen {
    Setup,
    Game,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Modal {
    EndOfRound,
    Winner,
    ManageGames,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub selected_game: usize,
    pub players: Vec<String>,
    pub name_input: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub selected_player: usize,
    pub points_input: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    #[default]
    Name,
    Score,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManageGamesForm {
    pub selected: usize,
    pub name_input: String,
    pub score_input: String,
    pub field: GameField,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub records: Vec<HistoryRecord>,
    pub selected: usize,
    pub expanded: bool,
}

/// Application state for the terminal UI.
pub struct App {
    pub config: Config,
    store: Box<dyn ConfigStore>,
    history: Option<HistoryDb>,
    pub screen: Screen,
    pub modal: Option<Modal>,
    pub setup: SetupForm,
    pub session: Option<Session>,
    pub entry: ScoreEntry,
    pub manage: ManageGamesForm,
    pub history_view: HistoryView,
    pub status: Option<String>,
    pub last_verdict: Option<Verdict>,
    pub celebration: Celebration,
    pub viewport: (u16, u16),
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Box<dyn ConfigStore>, history: Option<HistoryDb>) -> Self {
        let config = store.load();
        let selected_game = config
            .last_game
            .as_deref()
            .and_then(|name| config.games.games().iter().position(|g| g.name == name))
            .unwrap_or_default();
        let setup = SetupForm {
            selected_game,
            players: config.last_players.clone(),
            name_input: String::new(),
        };

        let mut app = Self {
            config,
            store,
            history,
            screen: Screen::Setup,
            modal: None,
            setup,
            session: None,
            entry: ScoreEntry::default(),
            manage: ManageGamesForm::default(),
            history_view: HistoryView::default(),
            status: None,
            last_verdict: None,
            celebration: Celebration::new(),
            viewport: (80, 24),
            should_quit: false,
        };
        app.refresh_history();
        app
    }

    /// Preselect a game by name and replace the player list.
    pub fn preselect(&mut self, game: Option<&str>, players: &[String]) -> Result<()> {
        if let Some(name) = game {
            self.config.games.get(name)?;
            self.setup.selected_game = self
                .config
                .games
                .games()
                .iter()
                .position(|g| g.name == name.trim())
                .unwrap_or_default();
        }
        if !players.is_empty() {
            self.setup.players = players.to_vec();
        }
        Ok(())
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.config.games.games().get(self.setup.selected_game)
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.celebration.update(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => self.handle_key(key),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.modal {
            Some(Modal::EndOfRound) => self.on_end_of_round_key(key),
            Some(Modal::Winner) => self.on_winner_key(key),
            Some(Modal::ManageGames) => self.on_manage_games_key(key),
            None => match self.screen {
                Screen::Setup => self.on_setup_key(key),
                Screen::Game => self.on_game_key(key),
                Screen::History => self.on_history_key(key),
            },
        }
    }

    fn on_setup_key(&mut self, key: KeyEvent) {
        let game_count = self.config.games.len();
        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Up => {
                self.setup.selected_game = self.setup.selected_game.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.setup.selected_game + 1 < game_count {
                    self.setup.selected_game += 1;
                }
            }
            KeyCode::Tab => self.show_history(),
            KeyCode::F(2) => {
                self.manage = ManageGamesForm {
                    selected: self.setup.selected_game,
                    ..ManageGamesForm::default()
                };
                self.modal = Some(Modal::ManageGames);
            }
            KeyCode::Backspace => {
                if self.setup.name_input.pop().is_none() {
                    self.setup.players.pop();
                }
            }
            KeyCode::Enter => {
                let name = self.setup.name_input.trim().to_string();
                if name.is_empty() {
                    self.start_game();
                } else if self.setup.players.contains(&name) {
                    self.set_status(Error::DuplicatePlayer(name).to_string());
                } else {
                    self.setup.players.push(name);
                    self.setup.name_input.clear();
                }
            }
            KeyCode::Char(c) => self.setup.name_input.push(c),
            _ => {}
        }
    }

    fn on_game_key(&mut self, key: KeyEvent) {
        let player_count = self.session.as_ref().map_or(0, |s| s.players.len());
        match key.code {
            KeyCode::Esc => self.abandon_game(),
            KeyCode::Up => {
                self.entry.selected_player = self.entry.selected_player.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.entry.selected_player + 1 < player_count {
                    self.entry.selected_player += 1;
                }
            }
            KeyCode::Backspace => {
                self.entry.points_input.pop();
            }
            KeyCode::Enter => self.submit_points(),
            KeyCode::Char('e') => self.end_round(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '+' => {
                self.entry.points_input.push(c);
            }
            _ => {}
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        let count = self.history_view.records.len();
        match key.code {
            KeyCode::Esc | KeyCode::Tab => self.screen = Screen::Setup,
            KeyCode::Up => {
                self.history_view.selected = self.history_view.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.history_view.selected + 1 < count {
                    self.history_view.selected += 1;
                }
            }
            KeyCode::Enter => self.history_view.expanded = !self.history_view.expanded,
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected_history(),
            _ => {}
        }
    }

    fn on_end_of_round_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.modal = None;
                self.end_round();
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.modal = None;
                self.set_status("Finish the round, then press (e) to end it.");
            }
            _ => {}
        }
    }

    fn on_winner_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Esc => {
                self.close_finished_game();
                self.screen = Screen::Setup;
            }
            KeyCode::Char('h') => {
                self.close_finished_game();
                self.show_history();
            }
            _ => {}
        }
    }

    fn on_manage_games_key(&mut self, key: KeyEvent) {
        let count = self.config.games.len();
        match key.code {
            KeyCode::Esc => self.modal = None,
            KeyCode::Tab => {
                self.manage.field = match self.manage.field {
                    GameField::Name => GameField::Score,
                    GameField::Score => GameField::Name,
                };
            }
            KeyCode::Up => self.manage.selected = self.manage.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.manage.selected + 1 < count {
                    self.manage.selected += 1;
                }
            }
            KeyCode::Delete => {
                let selected = self.manage.selected;
                let name = self.config.games.games().get(selected).map(|g| g.name.clone());
                if let Some(name) = name {
                    self.delete_game(&name);
                }
            }
            KeyCode::Backspace => {
                match self.manage.field {
                    GameField::Name => self.manage.name_input.pop(),
                    GameField::Score => self.manage.score_input.pop(),
                };
            }
            KeyCode::Enter => {
                let name = self.manage.name_input.clone();
                let score = self.manage.score_input.clone();
                self.add_game(&name, &score);
            }
            KeyCode::Char(c) => match self.manage.field {
                GameField::Name => self.manage.name_input.push(c),
                GameField::Score if c.is_ascii_digit() || c == '-' => {
                    self.manage.score_input.push(c)
                }
                GameField::Score => {}
            },
            _ => {}
        }
    }

    pub fn add_game(&mut self, name: &str, score: &str) {
        let added = score
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidPoints(score.trim().to_string()))
            .and_then(|score| Game::new(name, score))
            .and_then(|game| {
                let label = format!("Added {} ({} points)", game.name, game.winning_score);
                self.config.games.add(game)?;
                Ok(label)
            });
        match added {
            Ok(label) => {
                self.manage.name_input.clear();
                self.manage.score_input.clear();
                self.manage.field = GameField::Name;
                self.manage.selected = self.config.games.len() - 1;
                self.persist_config();
                self.set_status(label);
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn delete_game(&mut self, name: &str) {
        match self.config.games.remove(name) {
            Ok(game) => {
                self.config.games.ensure_default();
                let last = self.config.games.len() - 1;
                self.manage.selected = self.manage.selected.min(last);
                self.setup.selected_game = self.setup.selected_game.min(last);
                if self.config.last_game.as_deref() == Some(game.name.as_str()) {
                    self.config.last_game = None;
                }
                self.persist_config();
                self.set_status(format!("Deleted {}", game.name));
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn start_game(&mut self) {
        let Some(game) = self.selected_game().cloned() else {
            self.set_status("Add a game first (F2)");
            return;
        };
        match Session::start(game, &self.setup.players, Local::now()) {
            Ok(session) => {
                self.config.last_game = Some(session.game.name.clone());
                self.config.last_players = session.players.clone();
                self.persist_config();

                self.session = Some(session);
                self.entry = ScoreEntry::default();
                self.last_verdict = None;
                self.status = None;
                self.celebration.stop();
                self.screen = Screen::Game;
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn submit_points(&mut self) {
        let input = std::mem::take(&mut self.entry.points_input);
        let delta = match parse_points(&input) {
            Ok(delta) => delta,
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };
        let selected = self.entry.selected_player;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(player) = session.players.get(selected).cloned() else {
            return;
        };
        match session.add_points(&player, delta, Local::now()) {
            Ok(update) => {
                self.set_status(format!(
                    "{} scored {} (New Total: {})",
                    update.player, delta, update.new_score
                ));
                if update.round_end_due {
                    self.modal = Some(Modal::EndOfRound);
                }
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn end_round(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.end_round(Local::now()) {
            Ok(verdict) => {
                self.set_status(verdict.message());
                if verdict.winner().is_some() {
                    self.record_finished_session();
                    self.modal = Some(Modal::Winner);
                    self.celebration.start(self.viewport.0, self.viewport.1);
                }
                self.last_verdict = Some(verdict);
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Leave the running game; it is kept in history as incomplete.
    pub fn abandon_game(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.is_finished() {
                session.abandon(Local::now());
                self.record_finished_session();
            }
        }
        self.close_finished_game();
        self.screen = Screen::Setup;
    }

    fn close_finished_game(&mut self) {
        self.session = None;
        self.modal = None;
        self.last_verdict = None;
        self.celebration.stop();
    }

    fn record_finished_session(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let record = session.to_record(Local::now());
        if let Some(db) = self.history.as_mut() {
            if let Err(e) = db.insert(&record) {
                log::error!("could not save session history: {}", e);
                self.status = Some(format!("Could not save history: {}", e));
            }
        } else {
            log::warn!("no history database, {} session not saved", record.game);
        }
        self.refresh_history();
    }

    pub fn show_history(&mut self) {
        self.refresh_history();
        self.history_view.selected = 0;
        self.history_view.expanded = false;
        self.screen = Screen::History;
    }

    fn refresh_history(&mut self) {
        if let Some(db) = self.history.as_ref() {
            match db.list(None) {
                Ok(records) => self.history_view.records = records,
                Err(e) => log::error!("could not read history: {}", e),
            }
        }
        let last = self.history_view.records.len().saturating_sub(1);
        self.history_view.selected = self.history_view.selected.min(last);
    }

    fn delete_selected_history(&mut self) {
        let id = self
            .history_view
            .records
            .get(self.history_view.selected)
            .and_then(|r| r.id);
        if let (Some(id), Some(db)) = (id, self.history.as_ref()) {
            match db.delete(id) {
                Ok(_) => self.set_status("History entry deleted"),
                Err(e) => self.set_status(e.to_string()),
            }
        }
        self.refresh_history();
    }

    fn persist_config(&mut self) {
        if let Err(e) = self.store.save(&self.config) {
            log::error!("could not save config: {}", e);
            self.status = Some(format!("Could not save settings: {}", e));
        }
    }

    fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = Some(message.into());
    }

    fn quit(&mut self) {
        if self.session.as_ref().is_some_and(|s| !s.is_finished()) {
            self.abandon_game();
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use assert_matches::assert_matches;

    fn app() -> App {
        App::new(
            Box::new(MemoryConfigStore::default()),
            Some(HistoryDb::open_in_memory().unwrap()),
        )
    }

    fn typed(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(AppEvent::char(c));
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(AppEvent::key(code));
    }

    fn app_with_game(score: i64, players: &[&str]) -> App {
        let mut app = app();
        app.add_game("Quick", &score.to_string());
        app.setup.selected_game = 1;
        for p in players {
            typed(&mut app, p);
            press(&mut app, KeyCode::Enter);
        }
        press(&mut app, KeyCode::Enter);
        app
    }

    fn add(app: &mut App, player_idx: usize, points: &str) {
        app.entry.selected_player = player_idx;
        typed(app, points);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn starts_on_setup_with_default_game() {
        let app = app();
        assert_eq!(app.screen, Screen::Setup);
        assert_eq!(app.selected_game().unwrap().name, "Rummikub");
        assert!(app.history_view.records.is_empty());
    }

    #[test]
    fn enter_adds_players_then_starts() {
        let app = app_with_game(10, &["Ann", "Bob"]);
        assert_eq!(app.screen, Screen::Game);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.players, vec!["Ann", "Bob"]);
        assert_eq!(session.game.name, "Quick");
        assert_eq!(app.config.last_players, vec!["Ann", "Bob"]);
    }

    #[test]
    fn cannot_start_without_players() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Setup);
        assert_eq!(app.status.as_deref(), Some("Please enter at least one player name"));
    }

    #[test]
    fn duplicate_player_is_refused_in_setup() {
        let mut app = app();
        typed(&mut app, "Ann");
        press(&mut app, KeyCode::Enter);
        typed(&mut app, "Ann");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.setup.players, vec!["Ann"]);
        assert!(app.status.unwrap().contains("more than once"));
    }

    #[test]
    fn backspace_edits_then_removes_players() {
        let mut app = app();
        typed(&mut app, "Ann");
        press(&mut app, KeyCode::Enter);
        typed(&mut app, "B");
        press(&mut app, KeyCode::Backspace);
        assert!(app.setup.name_input.is_empty());
        press(&mut app, KeyCode::Backspace);
        assert!(app.setup.players.is_empty());
    }

    #[test]
    fn invalid_points_are_rejected_before_the_session() {
        let mut app = app_with_game(10, &["Ann"]);
        app.entry.points_input = "abc".into();
        app.submit_points();
        assert!(app.session.as_ref().unwrap().point_log.is_empty());
        assert!(app.status.unwrap().contains("not a valid number"));
    }

    #[test]
    fn oversized_points_keep_the_score_intact() {
        let mut app = app_with_game(10, &["Ann"]);
        add(&mut app, 0, "9223372036854775807");
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.modal, None);

        add(&mut app, 0, "1");
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.score("Ann"), Some(i64::MAX));
        assert_eq!(session.point_log.len(), 1);
        assert!(app.status.as_deref().unwrap().contains("out of range"));

        add(&mut app, 0, "99999999999999999999");
        assert!(app.status.unwrap().contains("not a valid number"));
    }

    #[test]
    fn letters_are_not_typed_into_points() {
        let mut app = app_with_game(10, &["Ann"]);
        typed(&mut app, "1x2");
        assert_eq!(app.entry.points_input, "12");
    }

    #[test]
    fn reaching_threshold_opens_end_of_round_prompt() {
        let mut app = app_with_game(10, &["Ann", "Bob"]);
        add(&mut app, 0, "12");
        assert_eq!(app.modal, Some(Modal::EndOfRound));

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.modal, None);
        assert_matches!(app.last_verdict, Some(Verdict::Continuing { .. }));
        assert!(app.status.as_deref().unwrap().contains("1 more round"));
    }

    #[test]
    fn declining_end_of_round_keeps_playing() {
        let mut app = app_with_game(10, &["Ann", "Bob"]);
        add(&mut app, 0, "12");
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.modal, None);
        assert_eq!(app.last_verdict, None);
        add(&mut app, 1, "12");
        press(&mut app, KeyCode::Enter);
        assert_matches!(app.last_verdict, Some(Verdict::TieBroken { .. }));
    }

    #[test]
    fn two_rounds_in_the_lead_wins_and_saves_history() {
        let mut app = app_with_game(10, &["Ann", "Bob"]);
        add(&mut app, 0, "12");
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('e'));

        assert_eq!(app.modal, Some(Modal::Winner));
        assert_eq!(app.last_verdict, Some(Verdict::Won { winner: "Ann".into() }));
        assert!(app.celebration.is_active);
        assert_eq!(app.history_view.records.len(), 1);
        assert_eq!(app.history_view.records[0].winner.as_deref(), Some("Ann"));

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen, Screen::History);
        assert!(app.session.is_none());
    }

    #[test]
    fn abandoning_records_incomplete_session() {
        let mut app = app_with_game(10, &["Ann"]);
        add(&mut app, 0, "3");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Setup);
        assert!(app.session.is_none());
        assert_eq!(app.history_view.records.len(), 1);
        assert_eq!(app.history_view.records[0].winner_label(), "Incomplete");
    }

    #[test]
    fn history_entries_can_be_deleted() {
        let mut app = app_with_game(10, &["Ann"]);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::History);
        press(&mut app, KeyCode::Enter);
        assert!(app.history_view.expanded);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.history_view.records.is_empty());
    }

    #[test]
    fn manage_games_add_and_delete() {
        let mut app = app();
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.modal, Some(Modal::ManageGames));
        typed(&mut app, "Uno");
        press(&mut app, KeyCode::Tab);
        typed(&mut app, "5x00");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.config.games.get("Uno").unwrap().winning_score, 500);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Delete);
        assert!(app.config.games.find("Rummikub").is_none());
        assert_eq!(app.config.games.len(), 1);

        press(&mut app, KeyCode::Delete);
        // deleting the last game brings the default back
        assert_eq!(app.config.games.games()[0].name, "Rummikub");
    }

    #[test]
    fn bad_game_input_shows_error() {
        let mut app = app();
        app.add_game("", "10");
        assert_eq!(app.status.as_deref(), Some("Game name cannot be empty"));
        app.add_game("Uno", "0");
        assert!(app.status.as_deref().unwrap().contains("positive"));
        app.add_game("Rummikub", "50");
        assert!(app.status.as_deref().unwrap().contains("already exists"));
    }

    #[test]
    fn preselect_rejects_unknown_game() {
        let mut app = app();
        assert_matches!(app.preselect(Some("Nope"), &[]), Err(Error::UnknownGame(_)));
        app.preselect(Some("Rummikub"), &["Ann".to_string()]).unwrap();
        assert_eq!(app.setup.players, vec!["Ann"]);
    }

    #[test]
    fn ctrl_c_quits_and_saves_running_game() {
        let mut app = app_with_game(10, &["Ann"]);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert_eq!(app.history_view.records.len(), 1);
    }
}
