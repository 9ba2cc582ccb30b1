use crate::session::TestSession;
use std::time::Duration;

/// Fixed width of the progress bar rendered under the stats line.
pub const PROGRESS_BAR_WIDTH: usize = 50;

/// Words per minute using the standard 5-characters-per-word convention.
/// Zero before the clock starts or for a degenerate elapsed time.
pub fn wpm(chars_typed: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (chars_typed as f64 / 5.0) / secs * 60.0
}

/// Percentage of attempted characters typed correctly, under the monotonic
/// error-tally model: `attempted` is the cursor position and `errors` the
/// cumulative miss count, so corrections never raise the figure back to 100.
/// Clamped at zero; zero attempts yield zero.
pub fn accuracy(attempted: usize, errors: usize) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    let pct = (attempted as f64 - errors as f64) / attempted as f64 * 100.0;
    pct.max(0.0)
}

/// Fraction of the target covered by the cursor, clamped to [0, 1].
/// An empty target counts as fully covered.
pub fn progress(cursor: usize, target_len: usize) -> f64 {
    if target_len == 0 {
        return 1.0;
    }
    (cursor as f64 / target_len as f64).clamp(0.0, 1.0)
}

/// Number of filled cells in a `width`-cell progress bar.
pub fn filled_cells(progress: f64, width: usize) -> usize {
    (progress * width as f64).floor() as usize
}

/// Snapshot of the live figures for one session, taken at render time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Metrics {
    pub wpm: f64,
    pub accuracy: f64,
    pub progress: f64,
}

impl Metrics {
    pub fn of(session: &TestSession) -> Self {
        if !session.has_started() {
            return Self {
                wpm: 0.0,
                accuracy: 0.0,
                progress: progress(session.cursor(), session.target().len()),
            };
        }

        Self {
            wpm: wpm(session.typed().len(), session.elapsed()),
            accuracy: accuracy(session.cursor(), session.errors()),
            progress: progress(session.cursor(), session.target().len()),
        }
    }
}
