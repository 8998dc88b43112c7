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

//! Quiet period detection.
//!
//! The [`IdleTimer`] is a deadline rather than a running timer: whoever owns
//! it polls [`IdleTimer::fire_if_due`] from the same thread that arms and
//! cancels it. There is therefore no fire in flight that a cancel could miss,
//! and re-arming always leaves exactly one pending deadline.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct IdleTimer {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// Replaces any pending deadline with one a full quiet period from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Fires at most once per arm. Returns `true` if the deadline had been
    /// reached, disarming the timer.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_secs(2);

    #[test]
    fn fires_once_after_the_quiet_period() {
        let start = Instant::now();
        let mut timer = IdleTimer::new(QUIET);
        timer.arm(start);

        assert!(!timer.fire_if_due(start + Duration::from_millis(1999)));
        assert!(timer.fire_if_due(start + QUIET));
        assert!(!timer.fire_if_due(start + QUIET * 5));
        assert!(!timer.is_armed());
    }

    #[test]
    fn rearming_pushes_the_deadline_back() {
        let start = Instant::now();
        let mut timer = IdleTimer::new(QUIET);
        timer.arm(start);
        timer.arm(start + Duration::from_secs(1));

        assert!(!timer.fire_if_due(start + QUIET));
        assert!(timer.fire_if_due(start + Duration::from_secs(3)));
    }

    #[test]
    fn cancel_prevents_firing() {
        let start = Instant::now();
        let mut timer = IdleTimer::new(QUIET);
        timer.cancel();
        timer.arm(start);
        timer.cancel();

        assert!(!timer.fire_if_due(start + QUIET * 2));
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn unarmed_timer_never_fires() {
        let mut timer = IdleTimer::new(QUIET);
        assert!(!timer.fire_if_due(Instant::now() + QUIET));
        assert_eq!(timer.quiet_period(), QUIET);
    }
}
