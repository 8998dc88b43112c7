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

//! Search session orchestration.
//!
//! The [`SearchAggregator`] owns at most one search session at a time. A
//! session starts with a full scan of the guide and then stays open, folding
//! guide events into its result set until it is replaced or ended.
//!
//! The aggregator is not thread-safe and does not need to be: the
//! [`service`](super::service) worker is the only caller, so scanning, event
//! folding and idle polling are serialised. The only locks it ever takes are
//! the per-channel guide locks, through [`GuideStore::with_guide`], and it
//! never holds one while touching the result set or the observer.

use std::time::Instant;

use tracing::{debug, trace};

use crate::{
    config::SearchConfig,
    error::{SearchError, SearchResult},
    feed::{GuideEvent, RecordingChange},
    guide::GuideStore,
    model::{Program, SearchQuery},
    search::{Generations, IdleTimer, MatchPredicate, ResultSet, SearchObserver},
};

struct Session {
    generation: u64,
    query: SearchQuery,
    predicate: MatchPredicate,
    results: ResultSet,
    timer: IdleTimer,
    settled: bool,
}

pub struct SearchAggregator<O> {
    observer: O,
    config: SearchConfig,
    generations: Generations,
    session: Option<Session>,
}

impl<O: SearchObserver> SearchAggregator<O> {
    pub fn new(observer: O, config: SearchConfig, generations: Generations) -> Self {
        Self {
            observer,
            config,
            generations,
            session: None,
        }
    }

    /// Starts a new session and scans the guide for matches.
    ///
    /// The previous session, if any, is discarded. Matches are reported to
    /// the observer one at a time as the scan progresses, then the idle timer
    /// is armed.
    ///
    /// A channel restriction naming an unknown channel is not an error, it
    /// simply produces an empty result.
    ///
    /// # Errors
    ///
    /// * [`SearchError::EmptyQuery`] or [`SearchError::InvalidPattern`] if
    ///   the query text cannot be compiled. The observer is told via
    ///   [`SearchObserver::on_invalid_query`] and no session is started.
    /// * [`SearchError::StaleEvent`] if `generation` has been superseded,
    ///   either before the scan or part way through it.
    pub fn start_search(
        &mut self,
        generation: u64,
        query: SearchQuery,
        store: &GuideStore,
    ) -> SearchResult<usize> {
        if !self.generations.is_current(generation) {
            return Err(SearchError::StaleEvent { generation });
        }

        let predicate = match MatchPredicate::compile(&query.text) {
            Ok(predicate) => predicate,
            Err(e) => {
                self.session = None;
                self.observer.on_invalid_query(&e.to_string());
                return Err(e);
            }
        };

        debug!(generation, query = %query.text, channel = ?query.channel_id, "starting search");

        self.observer.on_search_started(&query);
        let session = self.session.insert(Session {
            generation,
            query,
            predicate,
            results: ResultSet::new(),
            timer: IdleTimer::new(self.config.quiet_period),
            settled: false,
        });
        self.observer.on_result_set_changed(session.results.programs());

        if let Err(e) = scan(session, store, &self.observer, &self.generations) {
            debug!(generation, "scan abandoned, session superseded");
            self.session = None;
            return Err(e);
        }

        let session = self
            .session
            .as_mut()
            .ok_or(SearchError::StaleEvent { generation })?;
        session.settled = false;
        session.timer.arm(Instant::now());

        debug!(generation, matches = session.results.len(), "scan complete");
        Ok(session.results.len())
    }

    /// Folds one guide event into the current session.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StaleEvent`] without any observable effect if
    /// the event belongs to a session other than the current one.
    pub fn handle_event(
        &mut self,
        generation: u64,
        event: GuideEvent,
        now: Instant,
    ) -> SearchResult<()> {
        if !self.generations.is_current(generation) {
            return Err(SearchError::StaleEvent { generation });
        }

        let session = match self.session.as_mut() {
            Some(session) if session.generation == generation => session,
            _ => return Err(SearchError::StaleEvent { generation }),
        };

        match event {
            GuideEvent::ProgramAdded(program) => {
                if session.predicate.matches_program(&program) && session.results.insert(program) {
                    session.results.sort();
                    session.settled = false;
                    session.timer.arm(now);
                    self.observer.on_result_set_changed(session.results.programs());
                }
            }

            GuideEvent::ProgramDeleted(program) => {
                session.results.remove(program.id);
                self.observer.on_result_set_changed(session.results.programs());
            }

            // Updates only refresh existing entries; a programme whose new
            // title now matches is not added.
            GuideEvent::ProgramUpdated(program) => {
                session.results.update(program);
                session.results.sort();
                self.observer.on_result_set_changed(session.results.programs());
            }

            GuideEvent::RecordingChanged { change, recording } => {
                let Some(index) = session.results.recording_owner(&recording) else {
                    trace!(recording = recording.id, "recording has no owner in results");
                    return Ok(());
                };

                if let Some(entry) = session.results.entry_mut(index) {
                    entry.recording = match change {
                        RecordingChange::Deleted => None,
                        RecordingChange::Added | RecordingChange::Updated => Some(recording),
                    };
                }
                session.results.sort();
                self.observer.on_result_set_changed(session.results.programs());
            }
        }

        Ok(())
    }

    /// Reports the session as settled if its quiet period has elapsed.
    ///
    /// Returns whether the settled notification was sent. A session that
    /// has been superseded is ended here and never reports settled.
    pub fn poll_idle(&mut self, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        if !self.generations.is_current(session.generation) {
            debug!(generation = session.generation, "dropping superseded session");
            self.session = None;
            return false;
        }

        if !session.timer.fire_if_due(now) {
            return false;
        }

        session.settled = true;
        debug!(
            generation = session.generation,
            matches = session.results.len(),
            "search settled"
        );
        self.observer.on_settled(session.results.len());
        true
    }

    /// When the next idle check is due, if one is pending for the current
    /// session.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.session
            .as_ref()
            .filter(|s| self.generations.is_current(s.generation))
            .and_then(|s| s.timer.deadline())
    }

    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(generation = session.generation, "search session ended");
        }
    }

    pub fn is_settled(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.settled)
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.session.as_ref().map(|s| &s.results)
    }

    pub fn query(&self) -> Option<&SearchQuery> {
        self.session.as_ref().map(|s| &s.query)
    }

    pub fn session_generation(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.generation)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}

/// Scans the session's target channels, one guide lock at a time.
fn scan<O: SearchObserver>(
    session: &mut Session,
    store: &GuideStore,
    observer: &O,
    generations: &Generations,
) -> SearchResult<()> {
    let generation = session.generation;

    let channels = match session.query.channel_id {
        Some(id) => {
            let channel = store.resolve_channel(id);
            if channel.is_none() {
                debug!(channel = id, "restricted search on unknown channel");
            }
            channel.into_iter().collect()
        }
        None => store.channels(),
    };

    for channel in channels {
        if !generations.is_current(generation) {
            return Err(SearchError::StaleEvent { generation });
        }

        let matches: Vec<Program> = store.with_guide(&channel, |guide| {
            guide
                .iter()
                .filter(|p| session.predicate.matches_program(p))
                .cloned()
                .collect()
        });

        for program in matches {
            if !generations.is_current(generation) {
                return Err(SearchError::StaleEvent { generation });
            }

            if session.results.insert(program) {
                session.results.sort();
                observer.on_result_set_changed(session.results.programs());
            }
        }
    }

    Ok(())
}
