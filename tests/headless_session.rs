use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typedash::app::{App, Flow, Screen, EASY_TEXT, MEDIUM_TEXT};
use typedash::db::Store;

// Headless integration without a TTY: drive the state machine with
// synthetic key events across the full menu -> username -> test -> result
// flow and check what ends up in the store.

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn word_multiset(text: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

fn type_out_target(app: &mut App) {
    let target: String = app.session.target().iter().collect();
    for c in target.chars() {
        assert_eq!(app.handle_key(key(KeyCode::Char(c))), Flow::Continue);
    }
}

#[test]
fn full_session_lands_on_the_leaderboard() {
    let store = Store::open_in_memory().unwrap();
    let mut app = App::new(store, None);

    // Pick Medium from the menu.
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.screen, Screen::UsernameEntry { .. }));

    for c in "ann".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.screen, Screen::Running);

    let target: String = app.session.target().iter().collect();
    assert_eq!(word_multiset(&target), word_multiset(MEDIUM_TEXT));

    type_out_target(&mut app);
    assert_eq!(app.screen, Screen::Finished { selected: 0 });
    assert_eq!(app.last_result.accuracy, 100.0);
    assert!(app.last_result.wpm > 0.0);

    // Return to the menu and read the refreshed scoreboard.
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.screen, Screen::MainMenu { selected: 0 });
    assert_eq!(app.scores.len(), 1);
    assert_eq!(app.scores[0].username, "ann");
    assert_eq!(app.scores[0].difficulty, "Medium");
    assert_eq!(
        app.scores[0].calculated_score,
        app.scores[0].wpm * app.scores[0].accuracy / 100.0
    );
}

#[test]
fn corrections_cost_accuracy_but_not_completion() {
    let store = Store::open_in_memory().unwrap();
    let mut app = App::new(store, Some(String::from("bob")));

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.screen, Screen::Running);

    let target: String = app.session.target().iter().collect();
    let mut chars = target.chars();

    // One miss at the start, backspaced and corrected.
    let first = chars.next().unwrap();
    let wrong = if first == '?' { '!' } else { '?' };
    app.handle_key(key(KeyCode::Char(wrong)));
    app.handle_key(key(KeyCode::Backspace));
    app.handle_key(key(KeyCode::Char(first)));
    for c in chars {
        app.handle_key(key(KeyCode::Char(c)));
    }

    assert_eq!(app.screen, Screen::Finished { selected: 0 });
    assert!(app.last_result.accuracy < 100.0);

    let scores = app.store().top_scores(1).unwrap();
    assert_eq!(scores[0].accuracy, app.last_result.accuracy);
}

#[test]
fn play_again_runs_the_same_passage_again() {
    let store = Store::open_in_memory().unwrap();
    let mut app = App::new(store, Some(String::from("cal")));

    app.handle_key(key(KeyCode::Enter));
    let first: String = app.session.target().iter().collect();
    type_out_target(&mut app);

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.screen, Screen::Running);
    assert!(!app.session.has_started());

    let second: String = app.session.target().iter().collect();
    assert_eq!(word_multiset(&first), word_multiset(&second));
    assert_eq!(word_multiset(&second), word_multiset(EASY_TEXT));

    type_out_target(&mut app);
    assert_eq!(app.store().top_scores(10).unwrap().len(), 2);
}

#[test]
fn escape_mid_test_persists_nothing() {
    let store = Store::open_in_memory().unwrap();
    let mut app = App::new(store, Some(String::from("dee")));

    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('x')));
    assert_eq!(app.handle_key(key(KeyCode::Esc)), Flow::Exit);

    assert!(app.store().top_scores(10).unwrap().is_empty());
}
