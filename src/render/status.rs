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

//! Render the search status line.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Padding, Paragraph, Block},
};

use crate::App;

pub(crate) fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let colour = if app.status.is_error() {
        app.theme.error_colour
    } else {
        app.theme.status_colour
    };

    f.render_widget(
        Paragraph::new(app.status.message())
            .style(Style::default().fg(colour))
            .block(Block::default().padding(Padding::horizontal(1))),
        area,
    );
}
