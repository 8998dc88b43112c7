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

//! Ordered search results.
//!
//! A [`ResultSet`] holds at most one entry per programme identifier. Entries
//! are ordered by title, compared as raw strings (so case-sensitive), with
//! equal titles kept in the order they were inserted.

use crate::model::{Program, Recording};

#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<Program>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the programme unless an entry with the same identifier is
    /// already present. Returns whether membership changed.
    pub fn insert(&mut self, program: Program) -> bool {
        if self.contains(program.id) {
            return false;
        }

        self.entries.push(program);
        true
    }

    pub fn remove(&mut self, id: i64) -> bool {
        match self.entries.iter().position(|p| p.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the entry with the same identifier in place. Programmes not
    /// already in the set are ignored.
    pub fn update(&mut self, program: Program) -> bool {
        match self.entries.iter_mut().find(|p| p.id == program.id) {
            Some(entry) => {
                *entry = program;
                true
            }
            None => false,
        }
    }

    pub fn sort(&mut self) {
        // `sort_by` is stable, so equal titles keep their insertion order.
        self.entries.sort_by(|a, b| a.title.cmp(&b.title));
    }

    /// Index of the first entry that owns the recording, either because it
    /// already carries it or because the recording was scheduled from it.
    pub fn recording_owner(&self, recording: &Recording) -> Option<usize> {
        self.entries.iter().position(|p| {
            p.recording_id() == Some(recording.id) || recording.program_id == Some(p.id)
        })
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut Program> {
        self.entries.get_mut(index)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    pub fn programs(&self) -> &[Program] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn titles(set: &ResultSet) -> Vec<&str> {
        set.programs()
            .iter()
            .map(|p| p.title.as_deref().unwrap_or_default())
            .collect()
    }

    fn ids(set: &ResultSet) -> Vec<i64> {
        set.programs().iter().map(|p| p.id).collect()
    }

    #[test]
    fn insert_ignores_duplicate_identifiers() {
        let mut set = ResultSet::new();
        assert!(set.insert(Program::new(1, 1, "News")));
        assert!(!set.insert(Program::new(1, 1, "News again")));
        assert_eq!(set.len(), 1);
        assert_eq!(titles(&set), vec!["News"]);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut set = ResultSet::new();
        set.insert(Program::new(1, 1, "News"));
        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert!(set.is_empty());
    }

    #[test]
    fn update_replaces_in_place_and_ignores_unknown() {
        let mut set = ResultSet::new();
        set.insert(Program::new(1, 1, "A"));
        set.insert(Program::new(2, 1, "B"));
        set.insert(Program::new(3, 1, "C"));

        assert!(set.update(Program::new(2, 1, "B2")));
        assert_eq!(titles(&set), vec!["A", "B2", "C"]);

        assert!(!set.update(Program::new(9, 1, "Z")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn sort_is_case_sensitive_and_ascending() {
        let mut set = ResultSet::new();
        set.insert(Program::new(1, 1, "newsletter"));
        set.insert(Program::new(2, 1, "Evening News"));
        set.insert(Program::new(3, 1, "Zoo"));
        set.sort();
        assert_eq!(titles(&set), vec!["Evening News", "Zoo", "newsletter"]);
    }

    #[test]
    fn equal_titles_keep_insertion_order() {
        let mut set = ResultSet::new();
        set.insert(Program::new(5, 1, "News"));
        set.insert(Program::new(2, 1, "Arts"));
        set.insert(Program::new(9, 1, "News"));
        set.insert(Program::new(1, 1, "News"));
        set.sort();
        assert_eq!(ids(&set), vec![2, 5, 9, 1]);
    }

    #[test]
    fn recording_owner_matches_by_recording_or_programme() {
        let mut set = ResultSet::new();
        set.insert(Program::new(1, 1, "A"));
        set.insert(Program::new(2, 1, "B").with_recording(Recording::scheduled(50, 2)));

        assert_eq!(set.recording_owner(&Recording::scheduled(50, 99)), Some(1));
        assert_eq!(set.recording_owner(&Recording::scheduled(60, 1)), Some(0));

        let mut orphan = Recording::scheduled(70, 1);
        orphan.program_id = None;
        assert_eq!(set.recording_owner(&orphan), None);
    }

    proptest! {
        #[test]
        fn sorted_unique_and_stable(
            ops in prop::collection::vec((0i64..20, "[a-cA-C]{0,2}"), 0..60)
        ) {
            let mut set = ResultSet::new();
            let mut first_seen = Vec::new();
            for (id, title) in ops {
                if set.insert(Program::new(id, 1, title)) {
                    first_seen.push(id);
                }
                set.sort();

                let entries = set.programs();
                for pair in entries.windows(2) {
                    prop_assert!(pair[0].title <= pair[1].title);
                    if pair[0].title == pair[1].title {
                        let a = first_seen.iter().position(|i| *i == pair[0].id);
                        let b = first_seen.iter().position(|i| *i == pair[1].id);
                        prop_assert!(a < b);
                    }
                }

                let mut unique = ids(&set);
                unique.sort_unstable();
                unique.dedup();
                prop_assert_eq!(unique.len(), set.len());
            }
        }

        #[test]
        fn sort_is_idempotent(titles in prop::collection::vec("[a-zA-Z ]{0,6}", 0..40)) {
            let mut set = ResultSet::new();
            for (id, title) in titles.into_iter().enumerate() {
                set.insert(Program::new(id as i64, 1, title));
            }
            set.sort();
            let once = ids(&set);
            set.sort();
            prop_assert_eq!(once, ids(&set));
        }
    }
}
