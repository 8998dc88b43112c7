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

//! Channel lineup and programme guides.
//!
//! The [`GuideStore`] is shared between the data-acquisition side, which
//! writes to it, and readers such as the search aggregator.
//!
//! # Locking
//!
//! Every channel owns its guide behind its own lock. Readers never touch a
//! guide directly, they go through [`GuideStore::with_guide`] which holds the
//! lock for exactly the duration of the supplied closure. Anything a reader
//! wants to do with the programmes after that, such as mutating a result set
//! or notifying a UI, happens on a copy once the lock has been released.
//!
//! The channel list itself is behind a separate lock that is only held long
//! enough to clone the list of channel handles, so at most one guide lock is
//! ever held at a time.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::model::{Program, Recording};

pub struct Channel {
    pub id: i64,
    pub number: u32,
    pub name: String,
    guide: Mutex<Vec<Program>>,
}

impl Channel {
    fn new(id: i64, number: u32, name: String) -> Self {
        Self {
            id,
            number,
            name,
            guide: Mutex::new(Vec::new()),
        }
    }

    fn program_count(&self) -> usize {
        self.guide.lock().len()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("number", &self.number)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct GuideStore {
    channels: RwLock<Vec<Arc<Channel>>>,
}

impl GuideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a channel to the lineup, or returns the existing channel with the
    /// same identifier.
    pub fn add_channel(&self, id: i64, number: u32, name: impl Into<String>) -> Arc<Channel> {
        let mut channels = self.channels.write();
        if let Some(existing) = channels.iter().find(|c| c.id == id) {
            return Arc::clone(existing);
        }

        let channel = Arc::new(Channel::new(id, number, name.into()));
        channels.push(Arc::clone(&channel));
        channels.sort_by_key(|c| c.number);
        channel
    }

    /// Snapshot of the channel lineup, in channel number order.
    pub fn channels(&self) -> Vec<Arc<Channel>> {
        self.channels.read().clone()
    }

    pub fn resolve_channel(&self, id: i64) -> Option<Arc<Channel>> {
        self.channels.read().iter().find(|c| c.id == id).cloned()
    }

    /// Runs `f` against the channel's guide while holding that guide's lock.
    ///
    /// The lock is released when `f` returns. `f` must not call back into the
    /// store.
    pub fn with_guide<R>(&self, channel: &Channel, f: impl FnOnce(&[Program]) -> R) -> R {
        let guide = channel.guide.lock();
        f(&guide)
    }

    pub fn program_count(&self) -> usize {
        self.channels().iter().map(|c| c.program_count()).sum()
    }

    pub fn find_program(&self, id: i64) -> Option<Program> {
        self.channels()
            .iter()
            .find_map(|c| self.with_guide(c, |guide| guide.iter().find(|p| p.id == id).cloned()))
    }

    pub fn clear(&self) {
        self.channels.write().clear();
    }

    /// Inserts a programme into its channel's guide, keeping the guide ordered
    /// by start time.
    ///
    /// Returns a copy of the stored programme, or `None` if the channel is
    /// unknown or a programme with the same identifier already exists.
    pub fn insert_program(&self, program: Program) -> Option<Program> {
        let channel = self.resolve_channel(program.channel_id)?;
        let mut guide = channel.guide.lock();

        if guide.iter().any(|p| p.id == program.id) {
            return None;
        }

        let position = guide.partition_point(|p| p.start <= program.start);
        guide.insert(position, program.clone());
        Some(program)
    }

    /// Replaces a stored programme, returning the new copy if it was found.
    pub fn update_program(&self, program: Program) -> Option<Program> {
        self.modify_program(program.id, |stored| *stored = program.clone())
    }

    pub fn remove_program(&self, id: i64) -> Option<Program> {
        for channel in self.channels() {
            let mut guide = channel.guide.lock();
            if let Some(position) = guide.iter().position(|p| p.id == id) {
                return Some(guide.remove(position));
            }
        }

        None
    }

    /// Attaches a recording to the programme it was scheduled from.
    ///
    /// Returns the updated programme, or `None` if the recording names no
    /// programme or the programme is not in the guide.
    pub fn attach_recording(&self, recording: &Recording) -> Option<Program> {
        let program_id = recording.program_id?;
        self.modify_program(program_id, |stored| stored.recording = Some(recording.clone()))
    }

    /// Removes a recording from whichever programme currently owns it.
    pub fn detach_recording(&self, recording_id: i64) -> Option<Program> {
        for channel in self.channels() {
            let mut guide = channel.guide.lock();
            if let Some(program) = guide
                .iter_mut()
                .find(|p| p.recording_id() == Some(recording_id))
            {
                program.recording = None;
                return Some(program.clone());
            }
        }

        None
    }

    fn modify_program(&self, id: i64, f: impl FnOnce(&mut Program)) -> Option<Program> {
        for channel in self.channels() {
            let mut guide = channel.guide.lock();
            if let Some(program) = guide.iter_mut().find(|p| p.id == id) {
                f(program);
                return Some(program.clone());
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordingState;

    fn store_with_channels() -> GuideStore {
        let store = GuideStore::new();
        store.add_channel(10, 2, "Two");
        store.add_channel(20, 1, "One");
        store
    }

    #[test]
    fn channels_are_listed_in_number_order() {
        let store = store_with_channels();
        let names: Vec<_> = store.channels().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn adding_a_known_channel_returns_the_existing_one() {
        let store = store_with_channels();
        let again = store.add_channel(10, 99, "Renamed");
        assert_eq!(again.name, "Two");
        assert_eq!(store.channels().len(), 2);
    }

    #[test]
    fn insert_keeps_guide_ordered_by_start() {
        let store = store_with_channels();
        store.insert_program(Program::new(1, 10, "Late").with_times(300, 400));
        store.insert_program(Program::new(2, 10, "Early").with_times(100, 200));
        store.insert_program(Program::new(3, 10, "Middle").with_times(200, 300));

        let channel = store.resolve_channel(10).unwrap();
        let ids = store.with_guide(&channel, |guide| {
            guide.iter().map(|p| p.id).collect::<Vec<_>>()
        });
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn insert_rejects_unknown_channels_and_duplicates() {
        let store = store_with_channels();
        assert!(store.insert_program(Program::new(1, 99, "Nowhere")).is_none());
        assert!(store.insert_program(Program::new(1, 10, "First")).is_some());
        assert!(store.insert_program(Program::new(1, 10, "Again")).is_none());
        assert_eq!(store.program_count(), 1);
    }

    #[test]
    fn update_and_remove_find_programs_on_any_channel() {
        let store = store_with_channels();
        store.insert_program(Program::new(5, 20, "Quiz"));

        let mut renamed = Program::new(5, 20, "Big Quiz");
        renamed.summary = Some("Finals".into());
        let updated = store.update_program(renamed).unwrap();
        assert_eq!(updated.display_title(), Some("Big Quiz"));
        assert_eq!(store.find_program(5).unwrap().summary.as_deref(), Some("Finals"));

        assert!(store.remove_program(5).is_some());
        assert!(store.remove_program(5).is_none());
        assert!(store.find_program(5).is_none());
    }

    #[test]
    fn recordings_attach_to_their_programme_and_detach_by_id() {
        let store = store_with_channels();
        store.insert_program(Program::new(5, 20, "Film"));

        let mut recording = Recording::scheduled(70, 5);
        let owner = store.attach_recording(&recording).unwrap();
        assert_eq!(owner.recording_id(), Some(70));

        recording.state = RecordingState::Recording;
        let owner = store.attach_recording(&recording).unwrap();
        assert_eq!(owner.recording.unwrap().state, RecordingState::Recording);

        let owner = store.detach_recording(70).unwrap();
        assert_eq!(owner.id, 5);
        assert!(store.find_program(5).unwrap().recording.is_none());
        assert!(store.detach_recording(70).is_none());
    }

    #[test]
    fn unresolved_channel_is_none() {
        let store = store_with_channels();
        assert!(store.resolve_channel(404).is_none());
    }
}
