// Letterfall – A word game
// Copyright (C) 2024  Neil Roberts
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
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use super::config::{self, TIMED_START_SECONDS};
use super::leaderboard::Entry;
use super::resolver::MatchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Casual,
    Timed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} “{name}”")]
pub struct UnknownName {
    kind: &'static str,
    name: String,
}

impl FromStr for Mode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Mode, UnknownName> {
        match s.to_ascii_lowercase().as_str() {
            "casual" => Ok(Mode::Casual),
            "timed" => Ok(Mode::Timed),
            _ => Err(UnknownName { kind: "mode", name: s.to_string() }),
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Difficulty, UnknownName> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownName { kind: "difficulty", name: s.to_string() }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Casual => write!(f, "casual"),
            Mode::Timed => write!(f, "timed"),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Normal => write!(f, "normal"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub short: u32,
    pub long: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub score: u32,
    pub word_count: u32,
    pub best_word: String,
    pub level: u32,
    pub time_left: u32,
    pub target_score: u32,
    pub streaks: Streaks,
    pub last_score_added: u32,
}

impl Session {
    pub fn new(mode: Mode, difficulty: Difficulty) -> Session {
        Session {
            mode,
            difficulty,
            score: 0,
            word_count: 0,
            best_word: String::new(),
            level: 1,
            time_left: match mode {
                Mode::Timed => TIMED_START_SECONDS,
                Mode::Casual => 0,
            },
            target_score: config::target_score(1),
            streaks: Streaks::default(),
            last_score_added: 0,
        }
    }

    pub fn record_match(&mut self, outcome: &MatchOutcome) {
        self.score += outcome.total;
        self.word_count += 1;

        if outcome.word.chars().count() > self.best_word.chars().count() {
            self.best_word.clone_from(&outcome.word);
        }

        self.last_score_added = outcome.total;

        if self.mode == Mode::Timed {
            self.time_left += outcome.time_added;
        }
    }

    pub fn level_reached(&self) -> bool {
        self.score >= self.target_score
    }

    // The score is not reset so any points beyond the target count
    // towards the next level.
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.target_score = config::target_score(self.level);
        self.last_score_added = 0;
    }

    // Counts down one second and returns whether the time has run out
    pub fn tick(&mut self) -> bool {
        self.time_left = self.time_left.saturating_sub(1);
        self.time_left == 0
    }

    pub fn leaderboard_entry(&self, timestamp: u64) -> Entry {
        Entry {
            score: self.score,
            best_word: self.best_word.clone(),
            timestamp,
            level: (self.mode == Mode::Timed).then_some(self.level),
        }
    }
}
