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

//! # Television guide search.
//!
//! The core of a terminal client for a television-scheduling backend.
//!
//! The interesting part is the incremental search aggregator in [`search`]:
//! it scans a live programme guide that another thread keeps mutating,
//! builds a sorted result set as matches are found, folds asynchronous
//! add/update/delete notifications into that same result set, and reports
//! when result production has gone quiet.
//!
//! ## Architecture
//!
//! * [`guide`] holds channels and their lock-guarded programme guides.
//! * [`feed`] carries typed mutation events from the data-acquisition side
//!   to session-scoped subscribers.
//! * [`search`] owns the aggregator and the single worker thread that
//!   serialises scanning and event folding.
//! * [`acquisition`] is a simulated backend that mutates the guide and
//!   publishes events.
//! * [`db`] persists the guide snapshot and the recent query history.

pub mod acquisition;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod guide;
pub mod logging;
pub mod model;
pub mod search;

pub use error::SearchError;
