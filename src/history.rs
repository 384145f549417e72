use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::error::Result;
use crate::session::PointEntry;

/// An archived, read-only session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Database row id; `None` until the record has been stored.
    #[serde(skip)]
    pub id: Option<i64>,
    pub game: String,
    pub players: Vec<String>,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
    pub duration: String,
    pub winner: Option<String>,
    pub point_log: Vec<PointEntry>,
}

impl HistoryRecord {
    pub fn new(
        game: &str,
        players: Vec<String>,
        start_time: DateTime<Local>,
        end_time: Option<DateTime<Local>>,
        winner: Option<String>,
        point_log: Vec<PointEntry>,
    ) -> Self {
        let duration = match end_time {
            Some(end) => format_duration(end - start_time),
            None => "In Progress".to_string(),
        };
        Self {
            id: None,
            game: game.to_string(),
            players,
            start_time,
            end_time,
            duration,
            winner,
            point_log,
        }
    }

    pub fn winner_label(&self) -> &str {
        self.winner.as_deref().unwrap_or("Incomplete")
    }
}

/// Format an elapsed time as `"<minutes>m <seconds>s"`, rounded to the nearest second.
pub fn format_duration(elapsed: chrono::Duration) -> String {
    let total_secs = ((elapsed.num_milliseconds().max(0) as f64) / 1000.0).round() as i64;
    format!("{}m {}s", total_secs / 60, total_secs % 60)
}

/// Human friendly "how long ago" for the history list.
pub fn started_ago(start: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = (now - start).to_std().unwrap_or_default();
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        game TEXT NOT NULL,
        players TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT,
        duration TEXT NOT NULL,
        winner TEXT
    );
    CREATE TABLE IF NOT EXISTS point_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
        player TEXT NOT NULL,
        points_added INTEGER NOT NULL,
        new_score INTEGER NOT NULL,
        timestamp TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_point_log_session ON point_log(session_id);
    CREATE INDEX IF NOT EXISTS idx_sessions_start_time ON sessions(start_time);
"#;

/// SQLite store for finished sessions.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open (and create if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path.as_ref())?;
        log::debug!("opened history database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Store a record with its point log and return the new row id.
    pub fn insert(&mut self, record: &HistoryRecord) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO sessions (game, players, start_time, end_time, duration, winner)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.game,
                serde_json::to_string(&record.players)?,
                record.start_time.to_rfc3339(),
                record.end_time.map(|t| t.to_rfc3339()),
                record.duration,
                record.winner,
            ],
        )?;
        let session_id = tx.last_insert_rowid();

        for entry in &record.point_log {
            tx.execute(
                r#"
                INSERT INTO point_log (session_id, player, points_added, new_score, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    session_id,
                    entry.player,
                    entry.points_added,
                    entry.new_score,
                    entry.timestamp.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        log::info!(
            "saved {} session #{} ({} point entries)",
            record.game,
            session_id,
            record.point_log.len()
        );
        Ok(session_id)
    }

    /// All records, newest first. `limit` caps the number returned.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<HistoryRecord>> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, game, players, start_time, end_time, duration, winner
            FROM sessions
            ORDER BY start_time DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit], record_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            let mut record = row?;
            if let Some(id) = record.id {
                record.point_log = self.point_log(id)?;
            }
            records.push(record);
        }
        Ok(records)
    }

    fn point_log(&self, session_id: i64) -> Result<Vec<PointEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, points_added, new_score, timestamp
            FROM point_log
            WHERE session_id = ?1
            ORDER BY id
            "#,
        )?;
        let entries = stmt
            .query_map([session_id], |row| {
                Ok(PointEntry {
                    player: row.get(0)?,
                    points_added: row.get(1)?,
                    new_score: row.get(2)?,
                    timestamp: parse_time(3, &row.get::<_, String>(3)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn get(&self, id: i64) -> Result<Option<HistoryRecord>> {
        let record = self
            .conn
            .query_row(
                r#"
                SELECT id, game, players, start_time, end_time, duration, winner
                FROM sessions
                WHERE id = ?1
                "#,
                [id],
                record_from_row,
            )
            .optional()?;
        let Some(mut record) = record else {
            return Ok(None);
        };
        record.point_log = self.point_log(id)?;
        Ok(Some(record))
    }

    /// Delete one record. Returns whether anything was removed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

/// Maps a `sessions` row; the point log is loaded separately.
fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let players: String = row.get(2)?;
    let end_time: Option<String> = row.get(4)?;
    Ok(HistoryRecord {
        id: Some(row.get(0)?),
        game: row.get(1)?,
        players: serde_json::from_str(&players).map_err(|_| {
            rusqlite::Error::InvalidColumnType(2, "players".to_string(), rusqlite::types::Type::Text)
        })?,
        start_time: parse_time(3, &row.get::<_, String>(3)?)?,
        end_time: end_time.map(|t| parse_time(4, &t)).transpose()?,
        duration: row.get(5)?,
        winner: row.get(6)?,
        point_log: Vec::new(),
    })
}

fn parse_time(col: usize, text: &str) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Local))
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(col, "timestamp".to_string(), rusqlite::types::Type::Text)
        })
}

#[derive(Serialize)]
struct CsvRow<'a> {
    session: usize,
    game: &'a str,
    started: String,
    duration: &'a str,
    winner: &'a str,
    player: &'a str,
    points_added: i64,
    new_score: i64,
    timestamp: String,
}

/// Write records as CSV, one row per point-log entry.
pub fn export_csv<W: std::io::Write>(records: &[HistoryRecord], out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    let mut rows = 0;
    for (idx, record) in records.iter().enumerate() {
        for entry in &record.point_log {
            writer.serialize(CsvRow {
                session: idx + 1,
                game: &record.game,
                started: record.start_time.to_rfc3339(),
                duration: &record.duration,
                winner: record.winner_label(),
                player: &entry.player,
                points_added: entry.points_added,
                new_score: entry.new_score,
                timestamp: entry.timestamp.to_rfc3339(),
            })?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}
