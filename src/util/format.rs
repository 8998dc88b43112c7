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

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Formats a programme time, in seconds since the epoch, as a `HH:MM` wall
/// clock time (UTC).
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_clock(6 * 3600 + 30 * 60), "06:30");
/// ```
pub(crate) fn format_clock(epoch_seconds: i64) -> String {
    let seconds = epoch_seconds.rem_euclid(SECONDS_PER_DAY);
    format!("{:02}:{:02}", seconds / 3600, seconds / 60 % 60)
}
