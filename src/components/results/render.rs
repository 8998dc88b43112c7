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

//! UI rendering logic for the result table.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Cell, Row, Table},
};

use super::channel_name;
use crate::{
    components::ResultsTable,
    render::Render,
    theme::Theme,
    util::format::format_clock,
};

impl Render for ResultsTable<'_> {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let channel_names = self.channel_names;
        let time_style = Style::default().fg(theme.table_time_fg);
        let channel_style = Style::default().fg(theme.table_channel_fg);
        let title_style = Style::default().fg(theme.table_title_fg);
        let recording_style = Style::default().fg(theme.table_recording_fg);

        let rows = self.programs.iter().map(|item| {
            let recording = item
                .recording
                .as_ref()
                .map(|r| r.state.label())
                .unwrap_or("");
            let channel = channel_name(channel_names, item.channel_id);
            let title = item.display_title().unwrap_or("");

            Row::new(vec![
                Cell::from(Line::from(format_clock(item.start)).style(time_style)),
                Cell::from(Line::from(channel).style(channel_style)),
                Cell::from(Line::from(title).style(title_style)),
                Cell::from(Line::from(recording).style(recording_style)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(20),
                Constraint::Min(20),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from("Start"),
                Cell::from("Channel"),
                Cell::from("Title"),
                Cell::from("Recording"),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD).fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(theme.highlight_bg).fg(theme.highlight_fg))
        .block(Block::default());

        f.render_stateful_widget(table, area, &mut *self.table_state);
    }
}
