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

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use super::session::Mode;

pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub score: u32,
    pub best_word: String,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    #[serde(default)]
    casual: Vec<Entry>,
    #[serde(default)]
    timed: Vec<Entry>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Format {
        path: String,
        source: serde_json::Error,
    },
}

impl Leaderboard {
    pub fn new() -> Leaderboard {
        Leaderboard::default()
    }

    fn entries_mut(&mut self, mode: Mode) -> &mut Vec<Entry> {
        match mode {
            Mode::Casual => &mut self.casual,
            Mode::Timed => &mut self.timed,
        }
    }

    // Highest score first
    pub fn get(&self, mode: Mode) -> &[Entry] {
        match mode {
            Mode::Casual => &self.casual,
            Mode::Timed => &self.timed,
        }
    }

    // Adds the entry and returns whether it made it into the table. On
    // equal scores the older entry stays ahead.
    pub fn save(&mut self, mode: Mode, entry: Entry) -> bool {
        let entries = self.entries_mut(mode);
        let index = entries.partition_point(|e| e.score >= entry.score);

        entries.insert(index, entry);
        entries.truncate(MAX_ENTRIES);

        index < MAX_ENTRIES
    }
}

// Somewhere to keep the leaderboard between runs
pub trait LeaderboardStore {
    fn load(&self) -> Result<Leaderboard, Error>;
    fn store(&self, leaderboard: &Leaderboard) -> Result<(), Error>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> JsonFileStore {
        JsonFileStore { path: path.as_ref().to_path_buf() }
    }

    fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load(&self) -> Result<Leaderboard, Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no leaderboard at {}", self.path_string());
                return Ok(Leaderboard::new());
            },
            Err(source) => {
                return Err(Error::Io { path: self.path_string(), source });
            },
        };

        let mut leaderboard = serde_json::from_str::<Leaderboard>(&contents)
            .map_err(|source| {
                Error::Format { path: self.path_string(), source }
            })?;

        // Don’t trust the file to be in order
        for mode in [Mode::Casual, Mode::Timed] {
            let entries = leaderboard.entries_mut(mode);
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(MAX_ENTRIES);
        }

        Ok(leaderboard)
    }

    fn store(&self, leaderboard: &Leaderboard) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(leaderboard)
            .map_err(|source| {
                Error::Format { path: self.path_string(), source }
            })?;

        fs::write(&self.path, json).map_err(|source| {
            Error::Io { path: self.path_string(), source }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(score: u32, timestamp: u64) -> Entry {
        Entry {
            score,
            best_word: "WORD".to_string(),
            timestamp,
            level: None,
        }
    }

    fn scores(leaderboard: &Leaderboard, mode: Mode) -> Vec<u32> {
        leaderboard.get(mode).iter().map(|entry| entry.score).collect()
    }

    #[test]
    fn ordering() {
        let mut leaderboard = Leaderboard::new();

        assert!(leaderboard.save(Mode::Casual, entry(50, 1)));
        assert!(leaderboard.save(Mode::Casual, entry(200, 2)));
        assert!(leaderboard.save(Mode::Casual, entry(100, 3)));

        assert_eq!(scores(&leaderboard, Mode::Casual), [200, 100, 50]);
        assert!(leaderboard.get(Mode::Timed).is_empty());
    }

    #[test]
    fn cap() {
        let mut leaderboard = Leaderboard::new();

        for i in 0..MAX_ENTRIES as u64 {
            assert!(leaderboard.save(Mode::Timed, entry(100 + i as u32, i)));
        }

        // Too low to make the table
        assert!(!leaderboard.save(Mode::Timed, entry(10, 100)));
        assert_eq!(leaderboard.get(Mode::Timed).len(), MAX_ENTRIES);

        // Pushes the lowest entry out
        assert!(leaderboard.save(Mode::Timed, entry(500, 101)));
        let scores = scores(&leaderboard, Mode::Timed);
        assert_eq!(scores.len(), MAX_ENTRIES);
        assert_eq!(scores[0], 500);
        assert_eq!(*scores.last().unwrap(), 101);
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn ties_favour_older_entries() {
        let mut leaderboard = Leaderboard::new();

        for i in 0..MAX_ENTRIES as u64 {
            leaderboard.save(Mode::Casual, entry(100, i));
        }

        assert!(!leaderboard.save(Mode::Casual, entry(100, 50)));
        assert!(leaderboard.get(Mode::Casual).iter().all(|e| e.timestamp < 50));
    }

    #[test]
    fn repeated_key_that_misses_the_table() {
        let mut leaderboard = Leaderboard::new();

        for i in 0..MAX_ENTRIES as u64 {
            leaderboard.save(Mode::Timed, entry(100 + i as u32, i));
        }

        // Same timestamp and score as an entry already in the table
        let repeat = Entry {
            score: 100,
            best_word: "NEW".to_string(),
            timestamp: 0,
            level: None,
        };

        assert!(!leaderboard.save(Mode::Timed, repeat));
        assert_eq!(leaderboard.get(Mode::Timed).len(), MAX_ENTRIES);
        assert!(leaderboard.get(Mode::Timed)
                .iter()
                .all(|e| e.best_word == "WORD"));
    }

    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join(format!(
            "letterfall-missing-{}.json",
            std::process::id(),
        ));
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), Leaderboard::new());
    }

    #[test]
    fn round_trip() {
        let path = std::env::temp_dir().join(format!(
            "letterfall-leaderboard-{}.json",
            std::process::id(),
        ));
        let store = JsonFileStore::new(&path);

        let mut leaderboard = Leaderboard::new();
        leaderboard.save(Mode::Casual, entry(40, 7));
        leaderboard.save(
            Mode::Timed,
            Entry {
                score: 300,
                best_word: "GOLDEN".to_string(),
                timestamp: 8,
                level: Some(2),
            },
        );

        store.store(&leaderboard).unwrap();
        let loaded = store.load().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, leaderboard);
        assert_eq!(loaded.get(Mode::Timed)[0].level, Some(2));
        assert_eq!(loaded.get(Mode::Casual)[0].level, None);
    }

    #[test]
    fn bad_file() {
        let path = std::env::temp_dir().join(format!(
            "letterfall-bad-{}.json",
            std::process::id(),
        ));
        fs::write(&path, "not json").unwrap();

        let result = JsonFileStore::new(&path).load();
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(Error::Format { .. })));
    }
}
