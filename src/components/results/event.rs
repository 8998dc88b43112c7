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

//! Input handling for the result table.
//!
//! This module maps raw terminal keyboard events to table navigation.

use crossterm::event::{Event, KeyCode};

use crate::components::ResultsTable;

impl ResultsTable<'_> {
    /// Returns `true` if the event moved the selection.
    pub(crate) fn process_event(&mut self, event: &Event) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        match key_event.code {
            KeyCode::Char('j') | KeyCode::Down => self.goto_next(),
            KeyCode::Char('k') | KeyCode::Up => self.goto_previous(),
            KeyCode::Char('g') | KeyCode::Home => self.goto_first(),
            KeyCode::Char('G') | KeyCode::End => self.goto_last(),
            _ => return false,
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use rstest::rstest;
    use tvhguide::model::Program;

    use super::*;
    use crate::components::ResultsTableState;

    #[rstest]
    #[case(None, 'j', Some(0))]
    #[case(Some(0), 'j', Some(1))]
    #[case(Some(2), 'j', Some(0))]
    #[case(Some(0), 'k', Some(2))]
    #[case(Some(2), 'k', Some(1))]
    #[case(Some(1), 'g', Some(0))]
    #[case(Some(0), 'G', Some(2))]
    fn navigation_wraps(
        #[case] from: Option<usize>,
        #[case] c: char,
        #[case] to: Option<usize>,
    ) {
        let mut state = ResultsTableState::new();
        state.set_programs((1..=3).map(|id| Program::new(id, 1, "News")).collect());
        state.table_state.select(from);

        let event = Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        assert!(state.as_widget().process_event(&event));
        assert_eq!(state.table_state.selected(), to);
    }

    #[test]
    fn other_keys_are_not_consumed() {
        let mut state = ResultsTableState::new();
        let event = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!state.as_widget().process_event(&event));
    }
}
