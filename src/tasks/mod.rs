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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload potentially
//! blocking database work from the main UI thread. It provides a dedicated
//! worker loop that owns the database connection, translates [`AppTask`]
//! requests into database operations and broadcasts the results back to the
//! application via [`AppEvent`]s.
//!
//! Searching is not a task, it has its own worker in
//! [`tvhguide::search::SearchService`].

mod handlers;

use rusqlite::Connection;
use std::{
    sync::{
        Arc,
        mpsc::{Receiver, Sender},
    },
    thread,
};
use tracing::{debug, error};

use tvhguide::{config::AppConfig, db, guide::GuideStore};

use crate::actions::events::AppEvent;

#[derive(Debug)]
pub(crate) enum AppTask {
    LoadGuide,

    SaveRecentQuery(String),
    FetchRecentQueries,
}

/// Spawns a background thread to process application tasks.
///
/// This worker thread initializes its own database connection and enters
/// a blocking loop, listening for incoming [`AppTask`]s.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `store` - The guide that [`AppTask::LoadGuide`] populates.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    store: Arc<GuideStore>,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let mut conn = match db::init_db(&config.database_file) {
            Ok(conn) => conn,
            Err(e) => {
                error!("database unavailable: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(format!("Database unavailable: {:#}", e)));
                return;
            }
        };

        while let Ok(task) = task_rx.recv() {
            debug!(?task, "processing task");

            let mut ctx = TaskContext {
                config: &config,
                store: &store,
                event_tx: &event_tx,
                conn: &mut conn,
            };

            if let Err(e) = handlers::handle_task(task, &mut ctx) {
                let _ = event_tx.send(AppEvent::Error(format!("{:#}", e)));
            }
        }
    });
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    config: &'a AppConfig,
    store: &'a GuideStore,
    event_tx: &'a Sender<AppEvent>,
    conn: &'a mut Connection,
}
