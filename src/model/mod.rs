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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the guide, programmes and
//! their recordings, together with the search query value submitted by the
//! user.

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: i64,
    pub channel_id: i64,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub start: i64,
    pub stop: i64,
    pub recording: Option<Recording>,
}

impl Program {
    pub fn new(id: i64, channel_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            channel_id,
            title: Some(title.into()),
            summary: None,
            start: 0,
            stop: 0,
            recording: None,
        }
    }

    pub fn with_times(mut self, start: i64, stop: i64) -> Self {
        self.start = start;
        self.stop = stop;
        self
    }

    pub fn with_recording(mut self, recording: Recording) -> Self {
        self.recording = Some(recording);
        self
    }

    /// The title to display and match against, if there is a non-empty one.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.is_empty())
    }

    pub fn recording_id(&self) -> Option<i64> {
        self.recording.as_ref().map(|r| r.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Scheduled,
    Recording,
    Completed,
    Failed,
}

impl RecordingState {
    pub fn label(&self) -> &'static str {
        match self {
            RecordingState::Scheduled => "scheduled",
            RecordingState::Recording => "recording",
            RecordingState::Completed => "completed",
            RecordingState::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub id: i64,
    pub program_id: Option<i64>,
    pub title: Option<String>,
    pub state: RecordingState,
}

impl Recording {
    pub fn scheduled(id: i64, program_id: i64) -> Self {
        Self {
            id,
            program_id: Some(program_id),
            title: None,
            state: RecordingState::Scheduled,
        }
    }
}

/// A single search request.
///
/// Created once per search and never mutated, a new search replaces it
/// wholesale.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub channel_id: Option<i64>,
}

impl SearchQuery {
    pub fn all_channels(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel_id: None,
        }
    }

    pub fn for_channel(text: impl Into<String>, channel_id: i64) -> Self {
        Self {
            text: text.into(),
            channel_id: Some(channel_id),
        }
    }
}
