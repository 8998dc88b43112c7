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

//! Title matching for search queries.

use regex::{Regex, RegexBuilder};

use crate::{error::SearchError, model::Program};

/// A compiled, case-insensitive title pattern.
///
/// Matching is a substring search: the pattern may be found anywhere within
/// the title.
#[derive(Debug, Clone)]
pub struct MatchPredicate {
    pattern: Regex,
}

impl MatchPredicate {
    /// Compiles the query text as a case-insensitive regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] for empty text, which is never
    /// treated as a wildcard, and [`SearchError::InvalidPattern`] if the text
    /// is not a valid regular expression.
    pub fn compile(text: &str) -> Result<Self, SearchError> {
        if text.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let pattern = RegexBuilder::new(text)
            .case_insensitive(true)
            .build()
            .map_err(|e| SearchError::InvalidPattern {
                pattern: text.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { pattern })
    }

    pub fn matches(&self, title: &str) -> bool {
        !title.is_empty() && self.pattern.is_match(title)
    }

    pub fn matches_program(&self, program: &Program) -> bool {
        program
            .display_title()
            .is_some_and(|title| self.pattern.is_match(title))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}
