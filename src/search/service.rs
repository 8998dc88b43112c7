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

//! Background search processing.
//!
//! This module offloads guide scans from the caller's thread. A dedicated
//! worker owns the [`SearchAggregator`] and processes [`SearchTask`]s from a
//! single channel: search requests from the UI and guide events forwarded by
//! the session's feed subscription both arrive here, so the result set is
//! only ever touched by this one thread.
//!
//! Between tasks the worker waits no longer than the aggregator's idle
//! deadline, which is how a settled search gets reported without any other
//! timer thread.

use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use tracing::{debug, trace, warn};

use crate::{
    config::SearchConfig,
    error::{SearchError, SearchResult},
    feed::{EventFeed, GuideEvent, Subscription},
    guide::GuideStore,
    model::SearchQuery,
    search::{Generations, SearchAggregator, SearchObserver},
};

#[derive(Debug)]
pub(crate) enum SearchTask {
    Start { generation: u64, query: SearchQuery },
    Guide { generation: u64, event: GuideEvent },
    Stop,
    Shutdown,
}

/// A handle to the search worker.
///
/// Dropping the handle shuts the worker down and waits for it to finish.
pub struct SearchService {
    task_tx: Sender<SearchTask>,
    generations: Generations,
    worker: Option<JoinHandle<()>>,
}

impl SearchService {
    /// Spawns the search worker.
    ///
    /// # Arguments
    ///
    /// * `config` - Search settings, notably the quiet period.
    /// * `store` - The guide to scan.
    /// * `feed` - Source of live guide events, subscribed to per session.
    /// * `observer` - Receives progress, called from the worker thread.
    pub fn spawn<O>(
        config: SearchConfig,
        store: Arc<GuideStore>,
        feed: EventFeed,
        observer: O,
    ) -> Self
    where
        O: SearchObserver + Send + 'static,
    {
        let (task_tx, task_rx) = mpsc::channel();
        let generations = Generations::new();

        let aggregator = SearchAggregator::new(observer, config, generations.clone());
        let worker = Worker {
            aggregator,
            generations: generations.clone(),
            store,
            feed,
            task_tx: task_tx.clone(),
            subscription: None,
        };

        let worker = thread::Builder::new()
            .name("search-worker".into())
            .spawn(move || worker.run(task_rx))
            .ok();
        if worker.is_none() {
            warn!("failed to spawn search worker");
        }

        Self {
            task_tx,
            generations,
            worker,
        }
    }

    /// Starts a new search, superseding any search in progress.
    ///
    /// Returns the generation of the new session.
    pub fn search(&self, query: SearchQuery) -> SearchResult<u64> {
        let generation = self.generations.advance();
        self.task_tx
            .send(SearchTask::Start { generation, query })
            .map_err(|_| SearchError::ServiceClosed)?;
        Ok(generation)
    }

    /// Ends the current search, for example when the search view is closed.
    pub fn cancel(&self) -> SearchResult<()> {
        self.generations.advance();
        self.task_tx
            .send(SearchTask::Stop)
            .map_err(|_| SearchError::ServiceClosed)
    }

    pub fn generation(&self) -> u64 {
        self.generations.current()
    }
}

impl Drop for SearchService {
    fn drop(&mut self) {
        self.generations.advance();
        let _ = self.task_tx.send(SearchTask::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("search worker panicked");
            }
        }
    }
}

struct Worker<O> {
    aggregator: SearchAggregator<O>,
    generations: Generations,
    store: Arc<GuideStore>,
    feed: EventFeed,
    task_tx: Sender<SearchTask>,
    subscription: Option<Subscription>,
}

impl<O: SearchObserver> Worker<O> {
    fn run(mut self, task_rx: Receiver<SearchTask>) {
        loop {
            let task = match self.aggregator.next_deadline() {
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match task_rx.recv_timeout(timeout) {
                        Ok(task) => Some(task),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match task_rx.recv() {
                    Ok(task) => Some(task),
                    Err(_) => break,
                },
            };

            match task {
                Some(SearchTask::Start { generation, query }) => self.start(generation, query),
                Some(SearchTask::Guide { generation, event }) => {
                    let now = Instant::now();
                    if let Err(e) = self.aggregator.handle_event(generation, event, now) {
                        trace!("dropped guide event: {}", e);
                    }
                }
                Some(SearchTask::Stop) => {
                    self.subscription = None;
                    self.aggregator.end_session();
                }
                Some(SearchTask::Shutdown) => break,
                None => {}
            }

            self.aggregator.poll_idle(Instant::now());
        }

        self.subscription = None;
        debug!("search worker stopped");
    }

    fn start(&mut self, generation: u64, query: SearchQuery) {
        if !self.generations.is_current(generation) {
            trace!(generation, "skipping superseded search");
            return;
        }

        // Subscribe before scanning so nothing published during the scan is
        // missed; anything seen twice is de-duplicated by the result set.
        self.subscription = None;
        let task_tx = self.task_tx.clone();
        self.subscription = Some(self.feed.subscribe(move |event| {
            task_tx
                .send(SearchTask::Guide {
                    generation,
                    event: event.clone(),
                })
                .is_ok()
        }));

        match self.aggregator.start_search(generation, query, &self.store) {
            Ok(count) => debug!(generation, count, "initial scan finished"),
            Err(e) if e.is_user_facing() => {
                debug!(generation, "search not started: {}", e);
                self.subscription = None;
            }
            Err(e) => trace!("search abandoned: {}", e),
        }
    }
}
