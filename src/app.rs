use crate::db::{ScoreEntry, Store};
use crate::metrics::Metrics;
use crate::scramble::scramble;
use crate::session::TestSession;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

pub const EASY_TEXT: &str = "The quick brown fox jumps over the lazy dog. This is a simple typing test. Practice makes perfect. This sentence contains all letters of the alphabet. It is often used to test typewriters and computer keyboards. A quick brown fox is a common phrase.";
pub const MEDIUM_TEXT: &str = "A journey of a thousand miles begins with a single step. The early bird catches the worm. All that glitters is not gold. The greatest glory in living lies not in never falling, but in rising every time we fall. The future belongs to those who believe in the beauty of their dreams.";
pub const HARD_TEXT: &str = "The 1st rule of 2025 is: Never give up! @#$! Success often comes after a string of failures. Are you ready for the challenge? (Press ESC to exit) The only way to do great work is to love what you do. If you haven't found it yet, keep looking. Don't settle. As with all matters of the heart, you'll know when you find it.";

/// Number of leaderboard rows shown on the main menu.
pub const SCOREBOARD_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Dynamic,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Dynamic,
    ];

    /// Tag stored alongside a score row.
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Dynamic => "Dynamic",
        }
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Dynamic => "Dynamic (from DB)",
        }
    }
}

pub const RESTART_OPTIONS: [&str; 3] = ["Play again", "Go to Main Menu", "Exit"];

/// The screen currently owning input, plus its view-local state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    MainMenu { selected: usize },
    UsernameEntry { buffer: String },
    Running,
    Finished { selected: usize },
}

/// What the event loop should do after a key has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The one live session per process: current screen, the classifier for the
/// active test, and the injected persistence handle.
#[derive(Debug)]
pub struct App {
    store: Store,
    pub screen: Screen,
    pub username: Option<String>,
    pub scores: Vec<ScoreEntry>,
    pub session: TestSession,
    /// Figures frozen at the moment of completion, shown on the result screen.
    pub last_result: Metrics,
    passage: String,
    difficulty: Difficulty,
}

impl App {
    pub fn new(store: Store, username: Option<String>) -> Self {
        let scores = load_scores(&store);
        Self {
            store,
            screen: Screen::MainMenu { selected: 0 },
            username,
            scores,
            session: TestSession::new(""),
            last_result: Metrics::default(),
            passage: String::new(),
            difficulty: Difficulty::Easy,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Route one key event to the active screen. Esc and ctrl-c exit from
    /// every screen without persisting a partial score.
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Flow::Exit;
        }

        match self.screen.clone() {
            Screen::MainMenu { selected } => self.handle_main_menu_key(key, selected),
            Screen::UsernameEntry { buffer } => {
                self.handle_username_key(key, buffer);
                Flow::Continue
            }
            Screen::Running => {
                self.handle_running_key(key);
                Flow::Continue
            }
            Screen::Finished { selected } => self.handle_finished_key(key, selected),
        }
    }

    fn handle_main_menu_key(&mut self, key: KeyEvent, selected: usize) -> Flow {
        let len = Difficulty::ALL.len();
        match key.code {
            KeyCode::Up => {
                self.screen = Screen::MainMenu {
                    selected: (selected + len - 1) % len,
                };
            }
            KeyCode::Down => {
                self.screen = Screen::MainMenu {
                    selected: (selected + 1) % len,
                };
            }
            KeyCode::Enter => {
                let difficulty = Difficulty::ALL[selected];
                self.passage = self.resolve_passage(difficulty);
                self.difficulty = difficulty;

                if self.username.is_none() {
                    self.screen = Screen::UsernameEntry {
                        buffer: String::new(),
                    };
                } else {
                    self.begin_test();
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_username_key(&mut self, key: KeyEvent, mut buffer: String) {
        match key.code {
            KeyCode::Enter => {
                let name = if buffer.is_empty() {
                    String::from("Guest")
                } else {
                    buffer
                };
                self.username = Some(name);
                self.begin_test();
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.screen = Screen::UsernameEntry { buffer };
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.push(c);
                self.screen = Screen::UsernameEntry { buffer };
            }
            _ => {
                self.screen = Screen::UsernameEntry { buffer };
            }
        }
    }

    fn handle_running_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.write(c);
                if self.session.has_finished() {
                    self.finish_test();
                }
            }
            _ => {}
        }
    }

    fn handle_finished_key(&mut self, key: KeyEvent, selected: usize) -> Flow {
        let len = RESTART_OPTIONS.len();
        match key.code {
            KeyCode::Up => {
                self.screen = Screen::Finished {
                    selected: (selected + len - 1) % len,
                };
            }
            KeyCode::Down => {
                self.screen = Screen::Finished {
                    selected: (selected + 1) % len,
                };
            }
            KeyCode::Enter => match selected {
                0 => self.begin_test(),
                1 => self.enter_main_menu(),
                _ => return Flow::Exit,
            },
            _ => {}
        }
        Flow::Continue
    }

    /// Dynamic fetch falls back to the Easy passage; the user only ever sees
    /// a test start.
    fn resolve_passage(&self, difficulty: Difficulty) -> String {
        match difficulty {
            Difficulty::Easy => EASY_TEXT.to_string(),
            Difficulty::Medium => MEDIUM_TEXT.to_string(),
            Difficulty::Hard => HARD_TEXT.to_string(),
            Difficulty::Dynamic => match self.store.fetch_random_text() {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "dynamic text fetch failed, using easy passage");
                    EASY_TEXT.to_string()
                }
            },
        }
    }

    /// Start (or restart) a test over a fresh scramble of the chosen passage.
    fn begin_test(&mut self) {
        self.session = TestSession::new(&scramble(&self.passage));

        if self.session.has_finished() {
            // Empty passage: nothing to type, nothing to persist.
            self.last_result = Metrics::of(&self.session);
            self.screen = Screen::Finished { selected: 0 };
        } else {
            self.screen = Screen::Running;
        }
    }

    fn finish_test(&mut self) {
        self.last_result = Metrics::of(&self.session);

        let username = self.username.as_deref().unwrap_or("Guest");
        let entry = ScoreEntry::new(
            username,
            self.last_result.wpm,
            self.last_result.accuracy,
            self.difficulty.name(),
        );
        if let Err(err) = self.store.save_score(&entry) {
            warn!(error = %err, "failed to persist score");
        }

        self.screen = Screen::Finished { selected: 0 };
    }

    fn enter_main_menu(&mut self) {
        self.scores = load_scores(&self.store);
        self.screen = Screen::MainMenu { selected: 0 };
    }
}

fn load_scores(store: &Store) -> Vec<ScoreEntry> {
    store.top_scores(SCOREBOARD_LIMIT).unwrap_or_else(|err| {
        warn!(error = %err, "failed to load scoreboard");
        Vec::new()
    })
}
