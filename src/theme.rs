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

//! Visual styling and color configuration for the TUI.
//!
//! This module defines the application's color palette and provides utilities
//! for converting colors between Ratatui's internal representation and external
//! formats (such as hexadecimal strings) used for terminal emulator styling.

use ratatui::style::Color;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,

    pub(crate) commander_colour: Color,
    pub(crate) commander_bg: Color,
    pub(crate) hint_colour: Color,

    pub(crate) status_colour: Color,
    pub(crate) error_colour: Color,

    pub(crate) highlight_fg: Color,
    pub(crate) highlight_bg: Color,

    pub(crate) table_time_fg: Color,
    pub(crate) table_channel_fg: Color,
    pub(crate) table_title_fg: Color,
    pub(crate) table_recording_fg: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(20, 30, 45),
            accent_colour: Color::Rgb(250, 189, 47),

            commander_colour: Color::Rgb(255, 255, 255),
            commander_bg: Color::Rgb(30, 42, 60),
            hint_colour: Color::Rgb(120, 130, 150),

            status_colour: Color::Rgb(162, 161, 166),
            error_colour: Color::Rgb(235, 100, 90),

            highlight_fg: Color::White,
            highlight_bg: Color::Blue,

            table_time_fg: Color::Rgb(162, 161, 166),
            table_channel_fg: Color::Rgb(179, 157, 219),
            table_title_fg: Color::Rgb(255, 255, 255),
            table_recording_fg: Color::Rgb(255, 215, 0),
        }
    }

    /// Converts a [`ratatui::style::Color`] into a CSS-style hexadecimal
    /// string.
    ///
    /// This is used to set the terminal emulator's background color via
    /// escape sequences. Only [`Color::Rgb`] has a hexadecimal form, other
    /// colours give `None`.
    pub(crate) fn to_hex(colour: Color) -> Option<String> {
        match colour {
            Color::Rgb(r, g, b) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_colours_convert_to_hex() {
        assert_eq!(Theme::to_hex(Color::Rgb(20, 30, 255)).as_deref(), Some("#141eff"));
        assert_eq!(Theme::to_hex(Color::Blue), None);
    }

    #[test]
    fn default_background_is_rgb() {
        assert!(Theme::to_hex(Theme::default().background_colour).is_some());
    }
}
