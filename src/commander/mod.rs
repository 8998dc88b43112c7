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

//! Command-line input logic and state management.
//!
//! This module implements the logic for a command-line processing component,
//! handling a text input component, and dispatching a corresponding
//! application event when typing is finished and a command is submitted.
//!
//! # Commands
//!
//! * `/text` - Search every channel for `text`.
//! * `:c <number> text` - Search a single channel.
//! * `:x` - Cancel the current search.
//! * `:q` - Quit.
//!
//! While typing, Up and Down step through recently submitted searches.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use tvhguide::model::SearchQuery;

use crate::actions::events::AppEvent;

#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Search(SearchQuery),
    ChannelSearch { number: u32, text: String },
    Cancel,
    Quit,
}

/// Parses a submitted command line.
///
/// Returns `None` for anything that is not a recognised command.
pub(crate) fn parse_command(buffer: &str) -> Option<Command> {
    if let Some(text) = buffer.strip_prefix('/') {
        return Some(Command::Search(SearchQuery::all_channels(text)));
    }

    let command = buffer.strip_prefix(':')?.trim_start();
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));

    match name {
        "q" => Some(Command::Quit),
        "x" => Some(Command::Cancel),
        "c" => {
            let (number, text) = rest.trim_start().split_once(char::is_whitespace)?;
            Some(Command::ChannelSearch {
                number: number.parse().ok()?,
                text: text.trim_start().to_string(),
            })
        }
        _ => None,
    }
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
    history: Vec<String>,
    history_index: Option<usize>,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
            history: Vec::new(),
            history_index: None,
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Replaces the recent search history, most recent first.
    pub(crate) fn set_history(&mut self, history: Vec<String>) {
        self.history = history;
        self.history_index = None;
    }

    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        if !self.active {
            return match key_event.code {
                KeyCode::Char(c @ (':' | '/')) => {
                    self.active = true;
                    self.history_index = None;
                    self.input = Input::new(c.to_string());
                    true
                }

                _ => false,
            };
        }

        match key_event.code {
            KeyCode::Esc => self.deactivate(),

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                if let Some(command) = parse_command(&buffer) {
                    let _ = self.run_command(command, event_tx);
                }
                self.deactivate();
            }

            KeyCode::Up => self.recall(1),
            KeyCode::Down => self.recall(-1),

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
                if self.input.value().is_empty() {
                    self.deactivate();
                }
            }
        }

        true
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.history_index = None;
        self.input.reset();
    }

    /// Steps `delta` entries back through the history, towards older queries.
    fn recall(&mut self, delta: isize) {
        if self.history.is_empty() {
            return;
        }

        let next = match self.history_index {
            Some(index) => index.checked_add_signed(delta),
            None if delta > 0 => Some(0),
            None => None,
        };

        match next {
            Some(index) if index < self.history.len() => {
                self.history_index = Some(index);
                self.input = Input::new(format!("/{}", self.history[index]));
            }
            Some(_) => {}
            None => {
                self.history_index = None;
                self.input = Input::new("/".to_string());
            }
        }
    }

    fn run_command(&self, command: Command, event_tx: &Sender<AppEvent>) -> Result<()> {
        match command {
            Command::Search(query) => event_tx.send(AppEvent::NewSearchQuery(query))?,
            Command::ChannelSearch { number, text } => {
                event_tx.send(AppEvent::ChannelSearch { number, text })?
            }
            Command::Cancel => event_tx.send(AppEvent::CancelSearch)?,
            Command::Quit => event_tx.send(AppEvent::ExitApplication)?,
        }

        Ok(())
    }
}
