use chrono::{DateTime, Local};
use rand::Rng;
use rusqlite::{params, Connection, Result};
use std::path::Path;

/// One completed test, as persisted on the leaderboard. Created exactly once
/// at completion and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScoreEntry {
    pub username: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub calculated_score: f64,
    pub difficulty: String,
    pub timestamp: DateTime<Local>,
}

impl ScoreEntry {
    pub fn new(username: impl Into<String>, wpm: f64, accuracy: f64, difficulty: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            wpm,
            accuracy,
            calculated_score: wpm * (accuracy / 100.0),
            difficulty: difficulty.into(),
            timestamp: Local::now(),
        }
    }
}

/// Starter passages inserted into the text pool on first run.
const SEED_TEXTS: &[&str] = &[
    "The early bird catches the worm, but the second mouse gets the cheese.",
    "Innovation distinguishes between a leader and a follower. Stay curious.",
    "The only way to do great work is to love what you do. Find your passion.",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
    "Believe you can and you're halfway there. Doubt kills more dreams than failure ever will.",
];

/// SQLite store holding the dynamic text pool and the leaderboard.
///
/// Single-writer, read-after-write consistent; concurrent external writers
/// are out of scope.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path` and bootstrap its schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::bootstrap(Connection::open(path)?)
    }

    /// In-memory store, used by tests and as a last-ditch fallback.
    pub fn open_in_memory() -> Result<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS texts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL UNIQUE
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                wpm REAL NOT NULL,
                accuracy REAL NOT NULL,
                calculated_score REAL NOT NULL,
                difficulty TEXT NOT NULL DEFAULT 'Unknown',
                timestamp TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scores_calculated ON scores(calculated_score)",
            [],
        )?;

        Self::migrate_difficulty_column(&conn)?;
        Self::seed_texts(&conn)?;

        Ok(Store { conn })
    }

    /// Early databases predate the difficulty column; add it in place so
    /// old leaderboards keep working.
    fn migrate_difficulty_column(conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare("PRAGMA table_info(scores)")?;
        let has_difficulty = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|name| name.ok())
            .any(|name| name == "difficulty");
        drop(stmt);

        if !has_difficulty {
            conn.execute(
                "ALTER TABLE scores ADD COLUMN difficulty TEXT NOT NULL DEFAULT 'Unknown'",
                [],
            )?;
        }
        Ok(())
    }

    fn seed_texts(conn: &Connection) -> Result<()> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM texts", [], |row| row.get(0))?;
        if count == 0 {
            for text in SEED_TEXTS {
                conn.execute("INSERT OR IGNORE INTO texts (content) VALUES (?1)", [text])?;
            }
        }
        Ok(())
    }

    /// Compose a passage from 2-6 randomly drawn pool sentences. Errors if
    /// the pool is empty; the caller decides on a fallback.
    pub fn fetch_random_text(&self) -> Result<String> {
        let num_sentences = rand::thread_rng().gen_range(2..=6);

        let mut sentences = Vec::with_capacity(num_sentences);
        for _ in 0..num_sentences {
            let sentence: String = self.conn.query_row(
                "SELECT content FROM texts ORDER BY RANDOM() LIMIT 1",
                [],
                |row| row.get(0),
            )?;
            sentences.push(sentence);
        }
        Ok(sentences.join(" "))
    }

    pub fn save_score(&self, entry: &ScoreEntry) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO scores (username, wpm, accuracy, calculated_score, difficulty, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.username,
                entry.wpm,
                entry.accuracy,
                entry.calculated_score,
                entry.difficulty,
                entry.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The top `limit` scores, best calculated score first.
    pub fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT username, wpm, accuracy, calculated_score, difficulty, timestamp
            FROM scores
            ORDER BY calculated_score DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit], |row| {
            let timestamp_str: String = row.get(5)?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        5,
                        "timestamp".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(ScoreEntry {
                username: row.get(0)?,
                wpm: row.get(1)?,
                accuracy: row.get(2)?,
                calculated_score: row.get(3)?,
                difficulty: row.get(4)?,
                timestamp,
            })
        })?;

        rows.collect()
    }

    #[cfg(test)]
    pub(crate) fn clear_texts(&self) -> Result<()> {
        self.conn.execute("DELETE FROM texts", [])?;
        Ok(())
    }
}
