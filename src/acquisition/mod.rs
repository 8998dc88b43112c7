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

//! Simulated data acquisition.
//!
//! Stands in for the service that talks to the backend server. On a fixed
//! interval it invents a guide change, applies it to the [`GuideStore`] and
//! publishes the matching [`GuideEvent`], in that order, so that anyone who
//! reacts to the event and then reads the guide sees the change.

use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError, Sender},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use rand::seq::IndexedRandom;
use tracing::{debug, trace, warn};

use crate::{
    feed::{EventFeed, GuideEvent, RecordingChange},
    guide::GuideStore,
    model::{Program, Recording, RecordingState},
};

const TITLE_PREFIXES: [&str; 8] = [
    "Evening", "Morning", "Late", "Weekend", "World", "Local", "Breakfast", "Midnight",
];

const TITLE_SUBJECTS: [&str; 8] = [
    "News", "Sports", "Film", "Weather", "Quiz", "Documentary", "Cookery", "Drama",
];

/// Default length of an invented programme, in seconds.
const PROGRAM_LENGTH: i64 = 30 * 60;

/// A single change to the guide.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddProgram(Program),
    RetitleProgram { id: i64, title: String },
    DeleteProgram { id: i64 },
    ScheduleRecording(Recording),
    UpdateRecording(Recording),
    CancelRecording { id: i64 },
}

/// Applies a mutation to the guide and publishes the resulting event.
///
/// Returns the published event, or `None` if the mutation referred to
/// something no longer in the guide.
pub fn apply(store: &GuideStore, feed: &EventFeed, mutation: Mutation) -> Option<GuideEvent> {
    let event = match mutation {
        Mutation::AddProgram(program) => GuideEvent::ProgramAdded(store.insert_program(program)?),

        Mutation::RetitleProgram { id, title } => {
            let mut program = store.find_program(id)?;
            program.title = Some(title);
            GuideEvent::ProgramUpdated(store.update_program(program)?)
        }

        Mutation::DeleteProgram { id } => GuideEvent::ProgramDeleted(store.remove_program(id)?),

        Mutation::ScheduleRecording(recording) => {
            store.attach_recording(&recording)?;
            GuideEvent::RecordingChanged {
                change: RecordingChange::Added,
                recording,
            }
        }

        Mutation::UpdateRecording(recording) => {
            store.attach_recording(&recording)?;
            GuideEvent::RecordingChanged {
                change: RecordingChange::Updated,
                recording,
            }
        }

        Mutation::CancelRecording { id } => {
            let owner = store.detach_recording(id)?;
            GuideEvent::RecordingChanged {
                change: RecordingChange::Deleted,
                recording: Recording {
                    id,
                    program_id: Some(owner.id),
                    title: owner.title,
                    state: RecordingState::Failed,
                },
            }
        }
    };

    let delivered = feed.publish(event.clone());
    trace!(delivered, "published {:?}", event);
    Some(event)
}

#[derive(Clone, Copy)]
enum MutationKind {
    Add,
    Retitle,
    Delete,
    Schedule,
    Update,
    Cancel,
}

/// Invents a plausible mutation of the current guide.
///
/// Additions are weighted so the guide tends to grow.
pub fn next_mutation<R: rand::Rng + ?Sized>(
    rng: &mut R,
    store: &GuideStore,
    next_id: &mut i64,
) -> Option<Mutation> {
    use MutationKind::*;
    let kinds = [Add, Add, Add, Retitle, Delete, Schedule, Update, Cancel];
    let kind = *kinds.choose(rng)?;

    let channels = store.channels();
    let programs: Vec<Program> = channels
        .iter()
        .flat_map(|c| store.with_guide(c, |guide| guide.to_vec()))
        .collect();

    let mutation = match kind {
        Add => {
            let channel = channels.choose(rng)?;
            let title = invent_title(rng)?;
            let start = store.with_guide(channel, |guide| guide.last().map_or(0, |p| p.stop));
            *next_id += 1;
            let mut program = Program::new(*next_id, channel.id, title)
                .with_times(start, start + PROGRAM_LENGTH);
            program.summary = Some("Added by the live feed".into());
            Mutation::AddProgram(program)
        }

        Retitle => {
            let program = programs.choose(rng)?;
            Mutation::RetitleProgram {
                id: program.id,
                title: invent_title(rng)?,
            }
        }

        Delete => Mutation::DeleteProgram {
            id: programs.choose(rng)?.id,
        },

        Schedule => {
            let unrecorded: Vec<&Program> = programs
                .iter()
                .filter(|p| p.recording.is_none())
                .collect();
            let program = unrecorded.choose(rng)?;
            *next_id += 1;
            Mutation::ScheduleRecording(Recording {
                id: *next_id,
                program_id: Some(program.id),
                title: program.title.clone(),
                state: RecordingState::Scheduled,
            })
        }

        Update => {
            let recorded: Vec<&Recording> = programs
                .iter()
                .filter_map(|p| p.recording.as_ref())
                .collect();
            let mut recording = (*recorded.choose(rng)?).clone();
            let states = [
                RecordingState::Recording,
                RecordingState::Completed,
                RecordingState::Failed,
            ];
            recording.state = *states.choose(rng)?;
            Mutation::UpdateRecording(recording)
        }

        Cancel => {
            let recorded: Vec<i64> = programs.iter().filter_map(|p| p.recording_id()).collect();
            Mutation::CancelRecording {
                id: *recorded.choose(rng)?,
            }
        }
    };

    Some(mutation)
}

fn invent_title<R: rand::Rng + ?Sized>(rng: &mut R) -> Option<String> {
    let prefix = TITLE_PREFIXES.choose(rng)?;
    let subject = TITLE_SUBJECTS.choose(rng)?;
    Some(format!("{} {}", prefix, subject))
}

/// A handle to the running acquisition thread.
///
/// The thread stops when the handle is dropped.
pub struct AcquisitionService {
    stop_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl AcquisitionService {
    /// Spawns the acquisition thread.
    ///
    /// # Arguments
    ///
    /// * `store` - The guide to mutate.
    /// * `feed` - Where to publish the resulting events.
    /// * `interval` - Time between mutations.
    pub fn spawn(store: Arc<GuideStore>, feed: EventFeed, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("acquisition".into())
            .spawn(move || {
                let mut rng = rand::rng();
                let mut next_id = highest_id(&store);

                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    if let Some(mutation) = next_mutation(&mut rng, &store, &mut next_id) {
                        apply(&store, &feed, mutation);
                    }
                }

                debug!("acquisition stopped");
            })
            .ok();
        if worker.is_none() {
            warn!("failed to spawn acquisition thread");
        }

        Self { stop_tx, worker }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for AcquisitionService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Highest programme or recording identifier in the guide, so invented ones
/// never collide.
fn highest_id(store: &GuideStore) -> i64 {
    store
        .channels()
        .iter()
        .flat_map(|c| {
            store.with_guide(c, |guide| {
                guide
                    .iter()
                    .map(|p| p.id.max(p.recording_id().unwrap_or(0)))
                    .collect::<Vec<_>>()
            })
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Receiver;

    fn setup() -> (GuideStore, EventFeed, Receiver<GuideEvent>, crate::feed::Subscription) {
        let store = GuideStore::new();
        store.add_channel(1, 1, "One");
        store.insert_program(Program::new(1, 1, "Evening News").with_times(0, 100));

        let feed = EventFeed::new();
        let (tx, rx) = mpsc::channel();
        let subscription = feed.subscribe(move |e| tx.send(e.clone()).is_ok());
        (store, feed, rx, subscription)
    }

    #[test]
    fn add_inserts_then_publishes() {
        let (store, feed, rx, _s) = setup();
        let program = Program::new(2, 1, "Quiz").with_times(100, 200);

        let event = apply(&store, &feed, Mutation::AddProgram(program.clone())).unwrap();

        assert_eq!(event, GuideEvent::ProgramAdded(program));
        assert_eq!(rx.try_recv().unwrap(), event);
        assert!(store.find_program(2).is_some());
    }

    #[test]
    fn retitle_publishes_an_update() {
        let (store, feed, rx, _s) = setup();

        let retitle = Mutation::RetitleProgram {
            id: 1,
            title: "Late News".into(),
        };
        apply(&store, &feed, retitle).unwrap();

        match rx.try_recv().unwrap() {
            GuideEvent::ProgramUpdated(p) => assert_eq!(p.display_title(), Some("Late News")),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(store.find_program(1).unwrap().display_title(), Some("Late News"));
    }

    #[test]
    fn delete_publishes_the_removed_programme() {
        let (store, feed, rx, _s) = setup();

        apply(&store, &feed, Mutation::DeleteProgram { id: 1 }).unwrap();

        assert!(matches!(rx.try_recv().unwrap(), GuideEvent::ProgramDeleted(p) if p.id == 1));
        assert_eq!(store.program_count(), 0);
    }

    #[test]
    fn recording_lifecycle_publishes_recording_changes() {
        let (store, feed, rx, _s) = setup();
        let mut recording = Recording::scheduled(10, 1);

        apply(&store, &feed, Mutation::ScheduleRecording(recording.clone())).unwrap();
        recording.state = RecordingState::Recording;
        apply(&store, &feed, Mutation::UpdateRecording(recording)).unwrap();
        apply(&store, &feed, Mutation::CancelRecording { id: 10 }).unwrap();

        let changes: Vec<RecordingChange> = rx
            .try_iter()
            .map(|e| match e {
                GuideEvent::RecordingChanged { change, recording } => {
                    assert_eq!(recording.id, 10);
                    change
                }
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(
            changes,
            vec![RecordingChange::Added, RecordingChange::Updated, RecordingChange::Deleted]
        );
        assert!(store.find_program(1).unwrap().recording.is_none());
    }

    #[test]
    fn mutations_on_missing_programmes_publish_nothing() {
        let (store, feed, rx, _s) = setup();

        assert!(apply(&store, &feed, Mutation::DeleteProgram { id: 42 }).is_none());
        assert!(apply(&store, &feed, Mutation::CancelRecording { id: 42 }).is_none());
        let schedule = Mutation::ScheduleRecording(Recording::scheduled(5, 42));
        assert!(apply(&store, &feed, schedule).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn invented_mutations_apply_cleanly() {
        let (store, feed, _rx, _s) = setup();
        let mut rng = rand::rng();
        let mut next_id = highest_id(&store);

        for _ in 0..200 {
            if let Some(mutation) = next_mutation(&mut rng, &store, &mut next_id) {
                apply(&store, &feed, mutation);
            }
        }

        let channel = store.resolve_channel(1).unwrap();
        store.with_guide(&channel, |guide| {
            for pair in guide.windows(2) {
                assert!(pair[0].start <= pair[1].start);
            }
        });
    }

    #[test]
    fn highest_id_covers_recordings() {
        let (store, _feed, _rx, _s) = setup();
        store.attach_recording(&Recording::scheduled(90, 1));
        assert_eq!(highest_id(&store), 90);
    }
}
