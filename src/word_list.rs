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

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use super::config::{MIN_WORD_LENGTH, MAX_WORD_LENGTH};
use super::dictionary::Dictionary;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Read(#[from] std::io::Error),
    #[error("the word list contains no usable words")]
    Empty,
}

// The word list is kept twice: once as a flat set for the final check
// when a word is submitted and once as a trie for the prefix checks.
#[derive(Debug, Clone)]
pub struct WordList {
    words: HashSet<String>,
    dictionary: Dictionary,
}

// Converts a line of a word list into the form used by the game, or
// None if it shouldn’t be included.
pub fn normalize(line: &str) -> Option<String> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let word = line.to_uppercase();
    let length = word.chars().count();

    (MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&length).then_some(word)
}

impl WordList {
    pub fn from_words<I, S>(words: I) -> WordList
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        let words = words.into_iter()
            .filter_map(|word| normalize(word.as_ref()))
            .collect::<HashSet<String>>();

        let dictionary = words.iter().collect::<Dictionary>();

        WordList { words, dictionary }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<WordList, Error> {
        let mut lines = Vec::new();

        for line in reader.lines() {
            lines.push(line?);
        }

        let word_list = WordList::from_words(lines);

        if word_list.is_empty() {
            Err(Error::Empty)
        } else {
            Ok(word_list)
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<WordList, Error> {
        let path = path.as_ref();

        let file = std::fs::File::open(path).map_err(|source| Error::Open {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;

        let word_list = WordList::from_reader(std::io::BufReader::new(file))?;

        log::debug!(
            "loaded {} words from {}",
            word_list.len(),
            path.to_string_lossy(),
        );

        Ok(word_list)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
