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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite result rows
//! and high-level domain models, ensuring type-safe extraction of model
//! attributes from database queries.

use rusqlite::{
    Result, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::model::{Program, Recording, RecordingState};

impl Program {
    /// Maps an SQLite row to a [`Program`] instance.
    ///
    /// Expects the programme columns followed by the (possibly null) columns
    /// of a left-joined recording.
    ///
    /// # Errors
    ///
    /// Returns a [`rusqlite::Error`] if:
    /// * The row does not contain enough columns.
    /// * The data in a column cannot be converted to the required Rust type.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id: i64 = row.get(0)?;
        let recording = match row.get::<_, Option<i64>>(6)? {
            Some(recording_id) => Some(Recording {
                id: recording_id,
                program_id: Some(id),
                title: row.get(7)?,
                state: row.get(8)?,
            }),
            None => None,
        };

        Ok(Self {
            id,
            channel_id: row.get(1)?,
            title: row.get(2)?,
            summary: row.get(3)?,
            start: row.get(4)?,
            stop: row.get(5)?,
            recording,
        })
    }
}

impl ToSql for RecordingState {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        let val = match self {
            RecordingState::Scheduled => 0,
            RecordingState::Recording => 1,
            RecordingState::Completed => 2,
            RecordingState::Failed => 3,
        };
        Ok(ToSqlOutput::from(val))
    }
}

impl FromSql for RecordingState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_i64()? {
            0 => Ok(RecordingState::Scheduled),
            1 => Ok(RecordingState::Recording),
            2 => Ok(RecordingState::Completed),
            3 => Ok(RecordingState::Failed),
            other => Err(FromSqlError::OutOfRange(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn recording_state_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        for state in [
            RecordingState::Scheduled,
            RecordingState::Recording,
            RecordingState::Completed,
            RecordingState::Failed,
        ] {
            let back: RecordingState = conn.query_row("SELECT ?", [state], |r| r.get(0)).unwrap();
            assert_eq!(back, state);
        }
    }

    #[test]
    fn unknown_recording_state_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<RecordingState> = conn.query_row("SELECT 9", [], |r| r.get(0));
        assert!(result.is_err());
    }
}
