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

//! End-to-end search sessions against a guide mutated through the
//! acquisition path.

use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    time::Duration,
};

use tvhguide::{
    acquisition::{self, Mutation},
    config::SearchConfig,
    feed::EventFeed,
    guide::GuideStore,
    model::{Program, Recording, RecordingState, SearchQuery},
    search::{SearchObserver, SearchService},
};

const QUIET: Duration = Duration::from_millis(150);
const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
enum Update {
    Started(String),
    Changed(Vec<(i64, Option<RecordingState>)>),
    Settled(usize),
    Invalid(String),
}

struct Forwarder(Sender<Update>);

impl SearchObserver for Forwarder {
    fn on_search_started(&self, query: &SearchQuery) {
        let _ = self.0.send(Update::Started(query.text.clone()));
    }

    fn on_result_set_changed(&self, programs: &[Program]) {
        let entries = programs
            .iter()
            .map(|p| (p.id, p.recording.as_ref().map(|r| r.state)))
            .collect();
        let _ = self.0.send(Update::Changed(entries));
    }

    fn on_settled(&self, count: usize) {
        let _ = self.0.send(Update::Settled(count));
    }

    fn on_invalid_query(&self, reason: &str) {
        let _ = self.0.send(Update::Invalid(reason.to_string()));
    }
}

struct Harness {
    store: Arc<GuideStore>,
    feed: EventFeed,
    service: SearchService,
    updates: Receiver<Update>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(GuideStore::new());
        store.add_channel(1, 1, "One");
        store.add_channel(2, 24, "News 24");
        store.insert_program(Program::new(10, 1, "Evening News").with_times(0, 60));
        store.insert_program(Program::new(11, 1, "Sports").with_times(60, 120));
        store.insert_program(Program::new(20, 2, "newsletter").with_times(0, 60));

        let feed = EventFeed::new();
        let (tx, updates) = mpsc::channel();
        let service = SearchService::spawn(
            SearchConfig { quiet_period: QUIET },
            Arc::clone(&store),
            feed.clone(),
            Forwarder(tx),
        );

        Self {
            store,
            feed,
            service,
            updates,
        }
    }

    fn apply(&self, mutation: Mutation) {
        assert!(acquisition::apply(&self.store, &self.feed, mutation).is_some());
    }

    /// Collects updates up to and including the next settled notification.
    fn until_settled(&self) -> (Vec<Update>, usize) {
        let mut seen = Vec::new();
        loop {
            match self.updates.recv_timeout(WAIT).expect("search did not settle") {
                Update::Settled(count) => return (seen, count),
                other => seen.push(other),
            }
        }
    }

    fn last_change(&self) -> Vec<(i64, Option<RecordingState>)> {
        let (seen, _) = self.until_settled();
        seen.into_iter()
            .rev()
            .find_map(|u| match u {
                Update::Changed(entries) => Some(entries),
                _ => None,
            })
            .expect("no result change before settling")
    }
}

fn ids(entries: &[(i64, Option<RecordingState>)]) -> Vec<i64> {
    entries.iter().map(|(id, _)| *id).collect()
}

#[test]
fn search_across_all_channels_is_sorted_by_title() {
    let harness = Harness::new();
    harness.service.search(SearchQuery::all_channels("news")).unwrap();

    let (seen, count) = harness.until_settled();
    assert_eq!(count, 2);
    assert_eq!(seen.first(), Some(&Update::Started("news".into())));
    match seen.last() {
        Some(Update::Changed(entries)) => assert_eq!(ids(entries), vec![10, 20]),
        other => panic!("unexpected update {other:?}"),
    }
}

#[test]
fn channel_search_only_scans_that_channel() {
    let harness = Harness::new();
    harness.service.search(SearchQuery::for_channel("news", 2)).unwrap();
    assert_eq!(ids(&harness.last_change()), vec![20]);
}

#[test]
fn unknown_channel_finds_nothing() {
    let harness = Harness::new();
    harness.service.search(SearchQuery::for_channel("news", 99)).unwrap();

    let (_, count) = harness.until_settled();
    assert_eq!(count, 0);
}

#[test]
fn live_mutations_are_reflected_in_the_results() {
    let harness = Harness::new();
    harness.service.search(SearchQuery::all_channels("news")).unwrap();
    harness.until_settled();

    harness.apply(Mutation::AddProgram(
        Program::new(30, 2, "Breakfast News").with_times(60, 120),
    ));
    assert_eq!(ids(&harness.last_change()), vec![30, 10, 20]);

    // Non-matching additions do not change anything, so only another match
    // gets reported.
    harness.apply(Mutation::AddProgram(Program::new(31, 1, "Quiz").with_times(120, 180)));
    harness.apply(Mutation::ScheduleRecording(Recording::scheduled(40, 10)));
    harness.apply(Mutation::AddProgram(Program::new(32, 1, "Late News").with_times(180, 240)));
    assert_eq!(
        harness.last_change(),
        vec![
            (30, None),
            (10, Some(RecordingState::Scheduled)),
            (32, None),
            (20, None),
        ]
    );

    harness.apply(Mutation::DeleteProgram { id: 20 });
    harness.apply(Mutation::CancelRecording { id: 40 });
    harness.apply(Mutation::RetitleProgram {
        id: 30,
        title: "Weekend News".into(),
    });
    harness.apply(Mutation::AddProgram(Program::new(33, 1, "World News").with_times(240, 300)));
    assert_eq!(
        harness.last_change(),
        vec![(10, None), (32, None), (30, None), (33, None)]
    );
}

#[test]
fn retitled_programme_does_not_join_the_results() {
    let harness = Harness::new();
    harness.service.search(SearchQuery::all_channels("news")).unwrap();
    harness.until_settled();

    harness.apply(Mutation::RetitleProgram {
        id: 11,
        title: "Sports News".into(),
    });
    harness.apply(Mutation::AddProgram(Program::new(34, 1, "News Review").with_times(120, 180)));

    assert_eq!(ids(&harness.last_change()), vec![10, 34, 20]);
}

#[test]
fn superseded_search_leaves_no_trace() {
    let harness = Harness::new();
    harness.service.search(SearchQuery::all_channels("news")).unwrap();
    harness.service.search(SearchQuery::all_channels("sport")).unwrap();

    // Everything reported after the second search started belongs to it.
    let (seen, count) = harness.until_settled();
    let restarted = seen
        .iter()
        .rposition(|u| *u == Update::Started("sport".into()))
        .expect("second search never started");
    for update in &seen[restarted..] {
        if let Update::Changed(entries) = update {
            assert!(ids(entries).iter().all(|id| *id == 11));
        }
    }
    assert_eq!(count, 1);

    harness.apply(Mutation::AddProgram(Program::new(35, 1, "Late News").with_times(120, 180)));
    harness.apply(Mutation::AddProgram(Program::new(36, 1, "Sport Extra").with_times(180, 240)));
    assert_eq!(ids(&harness.last_change()), vec![36, 11]);
}

#[test]
fn empty_query_is_reported_as_invalid() {
    let harness = Harness::new();
    harness.service.search(SearchQuery::all_channels("")).unwrap();

    match harness.updates.recv_timeout(WAIT).unwrap() {
        Update::Invalid(reason) => assert!(reason.contains("empty")),
        other => panic!("unexpected update {other:?}"),
    }

    // No session was started, so live matches go nowhere.
    harness.apply(Mutation::AddProgram(Program::new(37, 1, "News").with_times(120, 180)));
    assert!(harness.updates.recv_timeout(QUIET * 2).is_err());
}
