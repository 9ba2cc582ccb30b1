use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// One live typing test: the scrambled target text, the characters the user
/// has entered so far, and the running error tally.
///
/// The cursor is a logical character offset, one position per codepoint
/// regardless of byte width. The error tally is monotonic: backspacing over
/// a mistake and retyping it correctly does not erase it from the count.
#[derive(Debug)]
pub struct TestSession {
    target: Vec<char>,
    typed: Vec<char>,
    cursor: usize,
    errors: usize,
    started_at: Option<Instant>,
}

impl TestSession {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.chars().collect(),
            typed: Vec::new(),
            cursor: 0,
            errors: 0,
            started_at: None,
        }
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Wall-clock time since the first accepted keystroke, zero before that.
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// An empty target is complete from the outset; otherwise the test ends
    /// once the cursor has walked off the end of the target.
    pub fn has_finished(&self) -> bool {
        self.target.is_empty() || (self.started_at.is_some() && self.cursor >= self.target.len())
    }

    /// Correctness of the character typed at `idx`, recomputed from the
    /// buffers rather than tracked in a separate counter.
    pub fn outcome_at(&self, idx: usize) -> Option<Outcome> {
        let typed = *self.typed.get(idx)?;
        match self.target.get(idx) {
            Some(&expected) if typed == expected => Some(Outcome::Correct),
            Some(_) => Some(Outcome::Incorrect),
            None => None,
        }
    }

    /// Accept one keystroke. The first one arms the clock. Input arriving
    /// after completion (queued before the screen transition) is dropped.
    pub fn write(&mut self, c: char) {
        if self.has_finished() {
            return;
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }

        self.typed.push(c);
        if self.cursor < self.target.len() && c != self.target[self.cursor] {
            self.errors += 1;
        }
        self.cursor += 1;
    }

    /// Remove the last typed character. No-op at the start of the buffer.
    /// The error tally is left untouched.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.typed.pop();
            self.cursor -= 1;
        }
    }
}
