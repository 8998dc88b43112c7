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

use anyhow::{Context, Result};
use tracing::info;

use tvhguide::db;

use crate::{
    actions::events::AppEvent,
    tasks::{AppTask, TaskContext},
};

/// Orchestrates the execution of a single task.
///
/// This function implements the logic for each task and sends the result back
/// through the application event channel.
pub(super) fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::LoadGuide => load_guide(ctx),

        AppTask::SaveRecentQuery(query) => save_recent_query(ctx, &query),
        AppTask::FetchRecentQueries => fetch_recent_queries(ctx),
    }
}

fn load_guide(ctx: &mut TaskContext) -> Result<()> {
    if db::seed_demo_guide(ctx.conn).context("Failed to seed the guide")? {
        info!("seeded an empty database with the demonstration guide");
    }

    let (channels, programs) =
        db::load_guide(ctx.conn, ctx.store).context("Failed to load the guide")?;
    info!(channels, programs, "guide loaded");

    ctx.event_tx
        .send(AppEvent::GuideLoaded { channels, programs })?;

    Ok(())
}

fn save_recent_query(ctx: &mut TaskContext, query: &str) -> Result<()> {
    db::save_recent_query(ctx.conn, query)
}

fn fetch_recent_queries(ctx: &mut TaskContext) -> Result<()> {
    let queries = db::fetch_recent_queries(ctx.conn, ctx.config.recent_query_limit)?;
    ctx.event_tx.send(AppEvent::RecentQueries(queries))?;

    Ok(())
}
