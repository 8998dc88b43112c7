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

//! Incremental programme search.
//!
//! # Organization
//!
//! * [`matcher`]: compiles query text into a title predicate.
//! * [`results`]: the ordered, de-duplicated result set.
//! * [`timer`]: the quiet-period deadline used to report a settled search.
//! * [`aggregator`]: scans the guide and folds live guide events into the
//!   result set for one session at a time.
//! * [`service`]: runs an aggregator on its own worker thread, the single
//!   context on which all result set mutation happens.
//!
//! Sessions are identified by a generation number. Starting a search
//! advances the shared [`Generations`] counter before any work is queued, so
//! scans and events belonging to an older session can tell they have been
//! superseded and become no-ops.

pub mod aggregator;
pub mod matcher;
pub mod results;
pub mod service;
pub mod timer;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::model::{Program, SearchQuery};

pub use aggregator::SearchAggregator;
pub use matcher::MatchPredicate;
pub use results::ResultSet;
pub use service::SearchService;
pub use timer::IdleTimer;

/// Receives search progress, typically on behalf of a UI.
///
/// Every callback is made from the thread that owns the aggregator, and
/// never while a guide lock is held.
pub trait SearchObserver {
    fn on_search_started(&self, _query: &SearchQuery) {}

    /// The complete, sorted result list after a change.
    fn on_result_set_changed(&self, programs: &[Program]);

    /// No new match has arrived for a full quiet period.
    fn on_settled(&self, count: usize);

    fn on_invalid_query(&self, reason: &str);
}

/// Shared, monotonically increasing session counter.
#[derive(Debug, Clone, Default)]
pub struct Generations(Arc<AtomicU64>);

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every earlier one.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}
