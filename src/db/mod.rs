// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Data access layer.
//!
//! This module handles all interactions with the SQLite database, including
//! schema creation, loading the guide snapshot into a [`GuideStore`], and
//! the recent search history.
//!
//! # Tables
//!
//! * `channels` - The channel lineup.
//! * `programs` - Scheduled programmes, linked to channels.
//! * `recordings` - Recordings, linked to the programme they were scheduled
//!   from.
//! * `recent_queries` - Previously submitted search text, most recent first.
//!
//! # Performance
//!
//! Most functions in this module use [`rusqlite::Connection::prepare_cached`]
//! to reduce SQL parsing overhead.

mod model;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::{guide::GuideStore, model::Program};

/// Opens a connection to the SQLite database and configures performance settings.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
/// * **Performance Tuning**: Sets synchronous mode to `NORMAL`.
/// * **Constraints**: Enforces foreign key integrity.
/// * **Schema**: Executes [`create_schema`] to ensure all tables and indices exist.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened, if the initial
/// PRAGMA configuration fails, or if the schema initialization fails.
pub fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    configure(&conn)?;

    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(conn)
}

/// Create the database schema.
///
/// Removing a channel removes its programmes. Removing a programme keeps its
/// recordings but forgets which programme they came from.
///
/// This operation is wrapped in a single SQL transaction to ensure the schema
/// is updated atomically.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS channels (
            id INTEGER PRIMARY KEY,
            number INTEGER NOT NULL,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS programs (
            id INTEGER PRIMARY KEY,
            channel_id INTEGER NOT NULL,
            title TEXT,
            summary TEXT,
            start INTEGER NOT NULL,
            stop INTEGER NOT NULL,
            FOREIGN KEY (channel_id) REFERENCES channels (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_programs_channel_id ON programs (channel_id, start);

        CREATE TABLE IF NOT EXISTS recordings (
            id INTEGER PRIMARY KEY,
            program_id INTEGER UNIQUE,
            title TEXT,
            state INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (program_id) REFERENCES programs (id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS recent_queries (
            query TEXT PRIMARY KEY,
            last_used INTEGER NOT NULL
        );

        COMMIT;",
    )
    .context("Failed to create schema")
}

/// Loads the stored guide into `store`, replacing whatever it held.
///
/// Returns the number of channels and programmes loaded.
///
/// # Errors
///
/// Returns an error if the SQL query fails or if a row cannot be mapped.
pub fn load_guide(conn: &Connection, store: &GuideStore) -> Result<(usize, usize)> {
    store.clear();

    let mut stmt = conn.prepare_cached("SELECT id, number, name FROM channels ORDER BY number")?;
    let channels = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, u32>(1)?, row.get::<_, String>(2)?))
    })?;

    let mut channel_count = 0;
    for channel in channels {
        let (id, number, name) = channel?;
        store.add_channel(id, number, name);
        channel_count += 1;
    }

    let mut stmt = conn.prepare_cached(
        "SELECT p.id, p.channel_id, p.title, p.summary, p.start, p.stop, r.id, r.title, r.state
         FROM programs p
         LEFT JOIN recordings r ON r.program_id = p.id
         ORDER BY p.channel_id, p.start",
    )?;
    let programs = stmt.query_map([], Program::from_row)?;

    let mut program_count = 0;
    for program in programs {
        if store.insert_program(program?).is_some() {
            program_count += 1;
        }
    }

    Ok((channel_count, program_count))
}

/// Populates an empty database with a small demonstration lineup.
///
/// Returns `false` without changing anything if channels already exist.
pub fn seed_demo_guide(conn: &mut Connection) -> Result<bool> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM channels", [], |r| r.get(0))?;
    if existing > 0 {
        return Ok(false);
    }

    const CHANNELS: [(i64, u32, &str); 4] = [
        (1, 1, "One"),
        (2, 2, "Two"),
        (3, 4, "Four"),
        (4, 24, "News 24"),
    ];

    const SCHEDULE: [&str; 12] = [
        "Breakfast News",
        "Cookery School",
        "Film: The Long Goodbye",
        "Sports Round-up",
        "Local News",
        "Quiz Night",
        "Nature Documentary",
        "Evening News",
        "Drama: Harbour Lights",
        "newsletter",
        "Weather",
        "Late Film",
    ];

    let tx = conn.transaction()?;
    let mut id = 0i64;
    for (channel_index, (channel_id, number, name)) in CHANNELS.iter().enumerate() {
        tx.execute(
            "INSERT INTO channels (id, number, name) VALUES (?, ?, ?)",
            params![channel_id, number, name],
        )?;

        let mut start = 6 * 60 * 60;
        for slot in 0..SCHEDULE.len() {
            let title = SCHEDULE[(slot + channel_index * 3) % SCHEDULE.len()];
            id += 1;
            tx.execute(
                "INSERT INTO programs (id, channel_id, title, start, stop) VALUES (?, ?, ?, ?, ?)",
                params![id, channel_id, title, start, start + 90 * 60],
            )?;
            start += 90 * 60;
        }
    }
    tx.commit().context("Failed to commit demo guide")?;

    Ok(true)
}

/// Records a submitted query, moving it to the front of the history.
pub fn save_recent_query(conn: &Connection, query: &str) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO recent_queries (query, last_used)
         VALUES (?1, (SELECT COALESCE(MAX(last_used), 0) + 1 FROM recent_queries))
         ON CONFLICT (query) DO UPDATE SET last_used = excluded.last_used",
    )?;
    stmt.execute(params![query])?;

    Ok(())
}

/// Fetches up to `limit` recent queries, most recent first.
pub fn fetch_recent_queries(conn: &Connection, limit: usize) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare_cached("SELECT query FROM recent_queries ORDER BY last_used DESC LIMIT ?")?;
    let rows = stmt.query_map(params![limit as i64], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordingState;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        configure(&conn).unwrap();
        conn
    }

    #[test]
    fn seeding_only_happens_once() {
        let mut conn = memory_db();
        assert!(seed_demo_guide(&mut conn).unwrap());
        assert!(!seed_demo_guide(&mut conn).unwrap());

        let store = GuideStore::new();
        let (channels, programs) = load_guide(&conn, &store).unwrap();
        assert_eq!(channels, 4);
        assert_eq!(programs, 48);
        assert_eq!(store.program_count(), 48);
    }

    #[test]
    fn load_guide_attaches_recordings() {
        let conn = memory_db();
        conn.execute_batch(
            "INSERT INTO channels (id, number, name) VALUES (1, 1, 'One');
             INSERT INTO programs (id, channel_id, title, start, stop) VALUES (10, 1, 'Film', 0, 60);
             INSERT INTO programs (id, channel_id, title, start, stop) VALUES (11, 1, NULL, 60, 120);
             INSERT INTO recordings (id, program_id, title, state) VALUES (5, 10, 'Film', 1);",
        )
        .unwrap();

        let store = GuideStore::new();
        load_guide(&conn, &store).unwrap();

        let recording = store.find_program(10).unwrap().recording.unwrap();
        assert_eq!(recording.id, 5);
        assert_eq!(recording.program_id, Some(10));
        assert_eq!(recording.state, RecordingState::Recording);
        assert_eq!(store.find_program(11).unwrap().title, None);
    }

    #[test]
    fn load_guide_replaces_previous_contents() {
        let mut conn = memory_db();
        seed_demo_guide(&mut conn).unwrap();

        let store = GuideStore::new();
        store.add_channel(99, 99, "Stale");
        load_guide(&conn, &store).unwrap();

        assert!(store.resolve_channel(99).is_none());
    }

    #[test]
    fn recent_queries_are_most_recent_first_and_unique() {
        let conn = memory_db();
        for query in ["news", "film", "quiz", "news"] {
            save_recent_query(&conn, query).unwrap();
        }

        assert_eq!(
            fetch_recent_queries(&conn, 10).unwrap(),
            vec!["news", "quiz", "film"]
        );
        assert_eq!(fetch_recent_queries(&conn, 2).unwrap(), vec!["news", "quiz"]);
    }

    #[test]
    fn init_db_creates_a_wal_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.db");
        let path = path.to_str().unwrap();

        let mut conn = init_db(path).unwrap();
        seed_demo_guide(&mut conn).unwrap();
        drop(conn);

        let conn = init_db(path).unwrap();
        let store = GuideStore::new();
        assert_eq!(load_guide(&conn, &store).unwrap().0, 4);
    }
}
