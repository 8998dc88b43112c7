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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging the gap between user input (keyboard), background worker updates
//! (database, search), and the UI rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    asynchronous channel.
//! 2. **Process**: The [`process_events`] function updates the [`App`] state,
//!    hands work to background workers (the database task worker or the
//!    search service), and manages UI navigation logic.
//! 3. **Render**: After each event is processed, the UI is re-drawn using the
//!    `ratatui` terminal.

use std::{io::Stdout, sync::mpsc::Sender};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::{debug, error};

use tvhguide::{
    model::{Program, SearchQuery},
    search::SearchObserver,
};

use crate::{App, render::draw, tasks::AppTask};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    GuideLoaded { channels: usize, programs: usize },

    NewSearchQuery(SearchQuery),
    ChannelSearch { number: u32, text: String },
    CancelSearch,

    SearchStarted(String),
    SearchResultsChanged(Vec<Program>),
    SearchSettled(usize),
    InvalidQuery(String),

    RecentQueries(Vec<String>),

    Tick,

    ExitApplication,

    Error(String),
}

/// Forwards search progress from the search worker into the application
/// event loop.
pub(crate) struct SearchForwarder(pub(crate) Sender<AppEvent>);

impl SearchObserver for SearchForwarder {
    fn on_search_started(&self, query: &SearchQuery) {
        let _ = self.0.send(AppEvent::SearchStarted(query.text.clone()));
    }

    fn on_result_set_changed(&self, programs: &[Program]) {
        let _ = self.0.send(AppEvent::SearchResultsChanged(programs.to_vec()));
    }

    fn on_settled(&self, count: usize) {
        let _ = self.0.send(AppEvent::SearchSettled(count));
    }

    fn on_invalid_query(&self, reason: &str) {
        let _ = self.0.send(AppEvent::InvalidQuery(reason.to_string()));
    }
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,

            AppEvent::GuideLoaded { channels, programs } => {
                app.results_view.set_channels(&app.store.channels());
                app.status.guide_loaded(channels, programs);
                app.start_acquisition();
            }

            AppEvent::NewSearchQuery(query) => start_search(app, query)?,
            AppEvent::ChannelSearch { number, text } => {
                let channel = app
                    .store
                    .channels()
                    .into_iter()
                    .find(|c| c.number == number);
                match channel {
                    Some(channel) => start_search(app, SearchQuery::for_channel(text, channel.id))?,
                    None => app.status.error(format!("No channel numbered {}", number)),
                }
            }
            AppEvent::CancelSearch => {
                app.search.cancel()?;
                app.results_view.clear();
                app.status.cancelled();
            }

            AppEvent::SearchStarted(text) => app.status.started(text),
            AppEvent::SearchResultsChanged(programs) => {
                app.status.results_changed(programs.len());
                app.results_view.set_programs(programs);
            }
            AppEvent::SearchSettled(count) => app.status.settled(count),
            AppEvent::InvalidQuery(reason) => {
                app.results_view.clear();
                app.status.invalid(reason);
            }

            AppEvent::RecentQueries(queries) => app.commander.set_history(queries),

            AppEvent::Error(message) => {
                error!("{}", message);
                app.status.error(message);
            }

            AppEvent::Tick => {}

            AppEvent::ExitApplication => {}
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

fn start_search(app: &mut App, query: SearchQuery) -> Result<()> {
    let text = query.text.clone();
    let generation = app.search.search(query)?;
    debug!(generation, "search requested");

    if !text.trim().is_empty() {
        app.task_tx.send(AppTask::SaveRecentQuery(text))?;
        app.task_tx.send(AppTask::FetchRecentQueries)?;
    }

    Ok(())
}

/// Maps keyboard input to application actions.
///
/// The commander gets the first chance to handle every key, anything it does
/// not consume goes to the result table and then to the global bindings.
///
/// # Errors
///
/// Returns an error if an event fails to send.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);
    if app.commander.handle_event(&event, &app.event_tx) {
        return Ok(());
    }

    if app.results_view.as_widget().process_event(&event) {
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,
        KeyCode::Esc => app.event_tx.send(AppEvent::CancelSearch)?,
        _ => {}
    }

    Ok(())
}
