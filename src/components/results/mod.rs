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

//! Interactive search result table and state management.
//!
//! This module provides the table component for displaying matching
//! programmes. It separates persistent state (`ResultsTableState`) from the
//! transient widget view (`ResultsTable`).

mod event;
mod render;

use std::collections::HashMap;

use ratatui::widgets::TableState;

use tvhguide::{guide::Channel, model::Program};

pub(crate) struct ResultsTableState {
    pub(crate) programs: Vec<Program>,
    pub(crate) channel_names: HashMap<i64, String>,
    pub(crate) table_state: TableState,
}

impl ResultsTableState {
    pub(crate) fn new() -> Self {
        Self {
            programs: vec![],
            channel_names: HashMap::new(),
            table_state: TableState::new(),
        }
    }

    pub(crate) fn set_channels<C: AsRef<Channel>>(&mut self, channels: &[C]) {
        self.channel_names = channels
            .iter()
            .map(|c| {
                let c = c.as_ref();
                (c.id, c.name.clone())
            })
            .collect();
    }

    /// Replaces the displayed programmes.
    ///
    /// The selection follows the selected programme if it is still present,
    /// otherwise it stays at the same row, clamped to the new length.
    pub(crate) fn set_programs(&mut self, programs: Vec<Program>) {
        let selected_id = self
            .table_state
            .selected()
            .and_then(|i| self.programs.get(i))
            .map(|p| p.id);

        let selection = match selected_id {
            Some(id) => programs.iter().position(|p| p.id == id).or_else(|| {
                self.table_state
                    .selected()
                    .map(|i| i.min(programs.len().saturating_sub(1)))
            }),
            None => None,
        };

        self.programs = programs;
        self.table_state
            .select(selection.filter(|_| !self.programs.is_empty()));
    }

    pub(crate) fn clear(&mut self) {
        self.programs.clear();
        self.table_state.select(None);
    }

    pub(crate) fn as_widget(&mut self) -> ResultsTable<'_> {
        ResultsTable {
            programs: &self.programs,
            channel_names: &self.channel_names,
            table_state: &mut self.table_state,
        }
    }
}

pub(crate) struct ResultsTable<'a> {
    programs: &'a [Program],
    channel_names: &'a HashMap<i64, String>,
    table_state: &'a mut TableState,
}

impl ResultsTable<'_> {
    fn goto_next(&mut self) {
        let len = self.programs.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.programs.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        if !self.programs.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn goto_last(&mut self) {
        if let Some(last) = self.programs.len().checked_sub(1) {
            self.table_state.select(Some(last));
        }
    }
}

/// The display name of a channel, or `?` for one not in the lineup.
fn channel_name(channel_names: &HashMap<i64, String>, channel_id: i64) -> &str {
    channel_names
        .get(&channel_id)
        .map(String::as_str)
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvhguide::guide::GuideStore;

    fn selected_id(state: &ResultsTableState) -> Option<i64> {
        state
            .table_state
            .selected()
            .and_then(|i| state.programs.get(i))
            .map(|p| p.id)
    }

    fn programs(ids: &[i64]) -> Vec<Program> {
        ids.iter()
            .map(|&id| Program::new(id, 1, format!("Programme {id}")))
            .collect()
    }

    #[test]
    fn selection_follows_the_selected_programme() {
        let mut state = ResultsTableState::new();
        state.set_programs(programs(&[1, 2, 3]));
        state.table_state.select(Some(1));

        state.set_programs(programs(&[0, 1, 2, 3]));
        assert_eq!(selected_id(&state), Some(2));
    }

    #[test]
    fn selection_is_clamped_when_the_programme_goes() {
        let mut state = ResultsTableState::new();
        state.set_programs(programs(&[1, 2, 3]));
        state.table_state.select(Some(2));

        state.set_programs(programs(&[1]));
        assert_eq!(selected_id(&state), Some(1));

        state.set_programs(vec![]);
        assert_eq!(state.table_state.selected(), None);
    }

    #[test]
    fn channel_names_come_from_the_guide() {
        let store = GuideStore::new();
        store.add_channel(7, 24, "News 24");

        let mut state = ResultsTableState::new();
        state.set_channels(&store.channels());
        assert_eq!(channel_name(&state.channel_names, 7), "News 24");
        assert_eq!(channel_name(&state.channel_names, 8), "?");
    }
}
