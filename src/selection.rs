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

use serde::Serialize;
use super::config::MIN_WORD_LENGTH;
use super::dictionary::{Dictionary, SearchResult};
use super::directions;
use super::grid::{Grid, Position};
use super::tile::{Tile, TileStatus};
use super::word_list::WordList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    OffGrid,
    Blocked,
    Removed,
    NotAdjacent,
    AlreadyVisited,
    NoSelection,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Appended,
    Backtracked,
    Unchanged,
}

// Live classification of the word built so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Neutral,
    Selected,
    Valid,
    Rejected,
}

impl Feedback {
    pub fn tile_status(self) -> TileStatus {
        match self {
            Feedback::Neutral => TileStatus::Idle,
            Feedback::Selected => TileStatus::Selected,
            Feedback::Valid => TileStatus::ValidPath,
            Feedback::Rejected => TileStatus::RejectedPrefix,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    path: Vec<Position>,
    word: String,
}

fn check_tile(grid: &Grid, pos: Position) -> Result<&Tile, Rejection> {
    let tile = grid.get(pos).ok_or(Rejection::OffGrid)?;

    if tile.is_blocked() {
        Err(Rejection::Blocked)
    } else if tile.is_removed() {
        Err(Rejection::Removed)
    } else {
        Ok(tile)
    }
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.word.clear();
    }

    pub fn begin(
        &mut self,
        grid: &Grid,
        pos: Position,
    ) -> Result<(), Rejection> {
        let tile = check_tile(grid, pos)?;

        self.clear();
        self.push(tile, pos);

        Ok(())
    }

    pub fn extend(
        &mut self,
        grid: &Grid,
        pos: Position,
    ) -> Result<Step, Rejection> {
        let Some(&last) = self.path.last()
        else {
            return Err(Rejection::NoSelection);
        };

        if pos == last {
            return Ok(Step::Unchanged);
        }

        if self.path.len() >= 2 && self.path[self.path.len() - 2] == pos {
            self.path.pop();
            self.word.pop();
            return Ok(Step::Backtracked);
        }

        let tile = check_tile(grid, pos)?;

        if self.path.contains(&pos) {
            return Err(Rejection::AlreadyVisited);
        }

        if !directions::is_adjacent(last, pos) {
            return Err(Rejection::NotAdjacent);
        }

        self.push(tile, pos);

        Ok(Step::Appended)
    }

    fn push(&mut self, tile: &Tile, pos: Position) {
        // check_tile has already ruled out blocked tiles so there is
        // always a letter
        if let Some(letter) = tile.letter() {
            self.path.push(pos);
            self.word.push(letter);
        }
    }

    pub fn feedback(&self, dictionary: &Dictionary) -> Feedback {
        if self.word.is_empty() {
            return Feedback::Neutral;
        }

        match dictionary.search(&self.word) {
            SearchResult::NoMatch => Feedback::Rejected,
            SearchResult::ExactWord if self.word_length() >= MIN_WORD_LENGTH => {
                Feedback::Valid
            },
            // Too-short exact words can’t be submitted so they only
            // count as selected
            SearchResult::ExactWord | SearchResult::PrefixOnly => {
                Feedback::Selected
            },
        }
    }

    pub fn is_submittable(&self, word_list: &WordList) -> bool {
        self.word_length() >= MIN_WORD_LENGTH && word_list.contains(&self.word)
    }

    fn word_length(&self) -> usize {
        self.word.chars().count()
    }
}
