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

//! Search progress as shown on the status line.

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SearchStatus {
    Loading,
    Ready { channels: usize, programs: usize },
    Searching { query: String, count: usize },
    Settled(usize),
    Invalid(String),
    Cancelled,
    Error(String),
}

impl SearchStatus {
    pub(crate) fn guide_loaded(&mut self, channels: usize, programs: usize) {
        if matches!(self, Self::Loading) {
            *self = Self::Ready { channels, programs };
        }
    }

    pub(crate) fn started(&mut self, query: String) {
        *self = Self::Searching { query, count: 0 };
    }

    /// Tracks the result count without changing whether the search is
    /// considered settled.
    pub(crate) fn results_changed(&mut self, len: usize) {
        match self {
            Self::Searching { count, .. } => *count = len,
            Self::Settled(count) => *count = len,
            _ => {}
        }
    }

    pub(crate) fn settled(&mut self, count: usize) {
        *self = Self::Settled(count);
    }

    pub(crate) fn invalid(&mut self, reason: String) {
        *self = Self::Invalid(reason);
    }

    pub(crate) fn cancelled(&mut self) {
        *self = Self::Cancelled;
    }

    pub(crate) fn error(&mut self, message: String) {
        *self = Self::Error(message);
    }

    pub(crate) fn is_error(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Error(_))
    }

    pub(crate) fn message(&self) -> String {
        match self {
            Self::Loading => "Loading guide...".to_string(),
            Self::Ready { channels, programs } => {
                format!("{} channels, {} programmes. Type / to search", channels, programs)
            }
            Self::Searching { query, count } => {
                format!("Searching \"{}\"... ({} results)", query, count)
            }
            Self::Settled(count) => format!("{} results", count),
            Self::Invalid(reason) => format!("Invalid search: {}", reason),
            Self::Cancelled => "Search cancelled".to_string(),
            Self::Error(message) => message.clone(),
        }
    }
}
