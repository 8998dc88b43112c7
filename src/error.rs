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

//! Search error taxonomy.
//!
//! None of these conditions are fatal. Invalid queries are reported to the
//! user, stale events are dropped, and a closed service simply stops
//! accepting new searches.

use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("empty search query")]
    EmptyQuery,

    #[error("invalid search pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("search session {generation} has been superseded")]
    StaleEvent { generation: u64 },

    #[error("search service has shut down")]
    ServiceClosed,
}

impl SearchError {
    /// Whether the error was caused by the text the user typed, and so
    /// should be shown to them.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::InvalidPattern { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_query_errors_are_user_facing() {
        assert!(SearchError::EmptyQuery.is_user_facing());
        assert!(
            SearchError::InvalidPattern {
                pattern: "(".into(),
                reason: "unclosed group".into()
            }
            .is_user_facing()
        );
        assert!(!SearchError::StaleEvent { generation: 3 }.is_user_facing());
        assert!(!SearchError::ServiceClosed.is_user_facing());
    }

    #[test]
    fn invalid_pattern_message_names_the_pattern() {
        let err = SearchError::InvalidPattern {
            pattern: "[a".into(),
            reason: "unclosed character class".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid search pattern `[a`: unclosed character class"
        );
    }
}
