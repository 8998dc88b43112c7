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

//! Guide mutation events and their distribution.
//!
//! The data-acquisition side publishes a [`GuideEvent`] after every change it
//! makes to the guide. Interested parties register a sink with the
//! [`EventFeed`] and receive a [`Subscription`] handle; the sink stays
//! registered for exactly as long as the handle is alive.
//!
//! Delivery is in publish order per publisher. Sinks are called with the
//! feed's registry lock held, so a sink must not subscribe or unsubscribe
//! from within the callback. In practice a sink just forwards the event into
//! a channel.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::model::{Program, Recording};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingChange {
    Added,
    Deleted,
    Updated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuideEvent {
    ProgramAdded(Program),
    ProgramDeleted(Program),
    ProgramUpdated(Program),
    RecordingChanged {
        change: RecordingChange,
        recording: Recording,
    },
}

type Sink = Box<dyn Fn(&GuideEvent) -> bool + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    sinks: Vec<(u64, Sink)>,
}

impl Registry {
    fn remove(&mut self, id: u64) {
        self.sinks.retain(|(sink_id, _)| *sink_id != id);
    }
}

#[derive(Clone, Default)]
pub struct EventFeed {
    registry: Arc<Mutex<Registry>>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sink for every subsequently published event.
    ///
    /// The sink returns `false` once its receiving end has gone away, after
    /// which it is pruned on the next publish.
    pub fn subscribe<F>(&self, sink: F) -> Subscription
    where
        F: Fn(&GuideEvent) -> bool + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.sinks.push((id, Box::new(sink)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers an event to every live subscriber, returning how many
    /// accepted it.
    pub fn publish(&self, event: GuideEvent) -> usize {
        let mut registry = self.registry.lock();
        registry.sinks.retain(|(_, sink)| sink(&event));
        registry.sinks.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().sinks.len()
    }
}

/// Keeps a sink registered with an [`EventFeed`].
///
/// Dropping the subscription unregisters the sink.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(self.id);
        }
    }
}
