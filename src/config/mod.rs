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

//! Application configuration.
//!
//! This module manages the application configuration file, and the search
//! settings derived from it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "tvhguide";

/// How long a search must go without a new match before it is reported as
/// settled.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub quiet_period: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub database_file: String,
    pub log_file: String,
    pub quiet_period_ms: u64,
    pub simulate_feed: bool,
    pub feed_interval_ms: u64,
    pub recent_query_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            database_file: "guide.db".to_string(),
            log_file: "tvhguide.log".to_string(),
            quiet_period_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            simulate_feed: true,
            feed_interval_ms: 750,
            recent_query_limit: 20,
        }
    }
}

impl AppConfig {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            quiet_period: Duration::from_millis(self.quiet_period_ms),
        }
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed_interval_ms)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}
