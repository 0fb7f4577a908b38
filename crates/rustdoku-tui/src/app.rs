use crate::leaderboard;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rustdoku_core::leaderboard::{guest_name, LeaderboardEntry, LeaderboardStore, NewScore};
use rustdoku_core::{Difficulty, Direction, Game, Intent, Position};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay (also shows the win banner once solved)
    Playing,
    /// Top-scores table
    Leaderboard,
}

/// Menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    None,
    NewGame,
}

/// The main application state: owns the game session, decodes key events
/// into engine intents, drives the one-second timer ticks, and talks to the
/// leaderboard store.
pub struct App {
    /// Current game session
    pub game: Game,
    /// Color theme
    pub theme: Theme,
    /// Whether the dark theme is active
    dark_theme: bool,
    /// Current screen
    pub screen: ScreenState,
    /// Active menu overlay
    pub menu: MenuState,
    /// Selected menu item
    pub menu_selection: usize,
    /// Message to display
    pub message: Option<String>,
    /// Message timer (ticks remaining)
    message_timer: u32,
    /// Cached top-scores list (empty on fetch failure)
    pub leaderboard: Vec<LeaderboardEntry>,
    store: Arc<dyn LeaderboardStore>,
    /// Whether the finished game's score has been handed off already
    score_submitted: bool,
    /// Start of the current one-second window
    last_second: Instant,
}

impl App {
    /// Create the app with a fresh game. A seed makes the puzzle
    /// reproducible.
    pub fn new(difficulty: Difficulty, seed: Option<u64>, store: Arc<dyn LeaderboardStore>) -> Self {
        let mut game = match seed {
            Some(seed) => Game::with_seed(difficulty, seed),
            None => Game::new(difficulty),
        };
        game.select_cell(Position::new(4, 4));

        let mut app = Self {
            game,
            theme: Theme::dark(),
            dark_theme: true,
            screen: ScreenState::Playing,
            menu: MenuState::None,
            menu_selection: 0,
            message: None,
            message_timer: 0,
            leaderboard: Vec::new(),
            store,
            score_submitted: false,
            last_second: Instant::now(),
        };
        app.refresh_leaderboard();
        app
    }

    /// Replace the session with a new game and re-request the top scores.
    pub fn new_game(&mut self, difficulty: Difficulty) {
        self.game = Game::new(difficulty);
        self.game.select_cell(Position::new(4, 4));
        self.score_submitted = false;
        self.last_second = Instant::now();
        self.screen = ScreenState::Playing;
        self.menu = MenuState::None;
        self.refresh_leaderboard();
        self.show_message(&format!("New {} game", difficulty));
    }

    /// Update timers and watch for the win transition (called every tick).
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        // Deliver whole-second ticks to the engine; it keeps no clock of
        // its own.
        while self.last_second.elapsed() >= Duration::from_secs(1) {
            self.last_second += Duration::from_secs(1);
            self.game.tick_second();
        }

        if self.game.is_won() && !self.score_submitted {
            self.score_submitted = true;
            self.submit_score();
            self.show_message(&format!("Solved! Final score {}", self.game.score()));
        }
    }

    /// Hand the finished score to the store, fire-and-forget.
    fn submit_score(&mut self) {
        let score = NewScore {
            player_name: guest_name(),
            score: self.game.score(),
            game_time_secs: self.game.elapsed_secs(),
            difficulty: self.game.difficulty(),
        };
        leaderboard::submit_detached(Arc::clone(&self.store), score);
    }

    fn refresh_leaderboard(&mut self) {
        self.leaderboard = match self.store.top_scores() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("leaderboard fetch failed: {e}");
                Vec::new()
            }
        };
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen {
            ScreenState::Leaderboard => self.handle_leaderboard_key(key),
            ScreenState::Playing => match self.menu {
                MenuState::None => self.handle_game_key(key),
                MenuState::NewGame => self.handle_menu_key(key),
            },
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Navigation (wraps around the edges)
            KeyCode::Up | KeyCode::Char('k') => self.game.handle_input(Intent::Move(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => {
                self.game.handle_input(Intent::Move(Direction::Down));
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.game.handle_input(Intent::Move(Direction::Left));
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.game.handle_input(Intent::Move(Direction::Right));
            }

            // Number input
            KeyCode::Char(c @ '1'..='9') => {
                let digit = c.to_digit(10).unwrap() as u8;
                self.enter_digit(digit);
            }

            // Clear cell
            KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => {
                self.game.handle_input(Intent::Clear);
            }

            // Undo/Redo
            KeyCode::Char('u') => {
                if self.game.undo() {
                    self.show_message("Undo");
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.game.redo() {
                    self.show_message("Redo");
                }
            }

            // Hint
            KeyCode::Char('?') => {
                if self.game.use_hint() {
                    self.show_message(&format!(
                        "Hint used ({}/{})",
                        self.game.hints_used(),
                        rustdoku_core::HINT_LIMIT
                    ));
                } else {
                    self.show_message("No hint available");
                }
            }

            // New game menu
            KeyCode::Char('n') => {
                self.menu = MenuState::NewGame;
                self.menu_selection = 0;
            }

            // Leaderboard
            KeyCode::Char('b') => {
                self.refresh_leaderboard();
                self.screen = ScreenState::Leaderboard;
            }

            // Theme toggle
            KeyCode::Char('t') => {
                self.dark_theme = !self.dark_theme;
                self.theme = if self.dark_theme {
                    Theme::dark()
                } else {
                    Theme::light()
                };
            }

            _ => {}
        }

        AppAction::Continue
    }

    fn enter_digit(&mut self, digit: u8) {
        if self.game.selected().is_some() && !self.game.is_digit_available(digit) {
            self.show_message(&format!("All {digit}s are already placed"));
            return;
        }
        if self.game.enter_digit(digit) == Some(false) {
            self.show_message("Incorrect");
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        let tiers = Difficulty::all();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.menu = MenuState::None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.menu_selection > 0 {
                    self.menu_selection -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection < tiers.len() - 1 {
                    self.menu_selection += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.new_game(tiers[self.menu_selection]);
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_leaderboard_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('b') => {
                self.screen = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }
}
