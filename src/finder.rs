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

use super::config::{GRID_SIZE, MIN_WORD_LENGTH, SEARCH_DEPTH_LIMIT};
use super::dictionary::{Dictionary, Walker};
use super::directions::{self, N_DIRECTIONS};
use super::grid::{Grid, Position};

struct StackEntry {
    pos: Position,
    node: usize,
    next_direction: u8,
}

// Searches a grid for any word that the player could make. The buffers
// are kept between searches so that repeated checks don’t allocate.
pub struct Finder {
    stack: Vec<StackEntry>,
    visited: Vec<bool>,
    route: Vec<Position>,
}

fn visited_index(pos: Position) -> usize {
    (pos.row * GRID_SIZE + pos.col) as usize
}

// Tries to move the walker onto the tile at pos. Returns None if the
// tile can’t be used or no word continues with its letter.
fn enter<'a>(
    grid: &Grid,
    visited: &[bool],
    walker: &Walker<'a>,
    pos: Position,
) -> Option<Walker<'a>> {
    let tile = grid.get(pos)?;

    if !tile.is_selectable() || visited[visited_index(pos)] {
        return None;
    }

    walker.step(tile.letter()?)
}

impl Finder {
    pub fn new() -> Finder {
        Finder {
            stack: Vec::new(),
            visited: Vec::new(),
            route: Vec::new(),
        }
    }

    fn find_from_position(
        &mut self,
        grid: &Grid,
        dictionary: &Dictionary,
        start: Position,
    ) -> bool {
        self.visited.clear();
        self.visited.resize((GRID_SIZE * GRID_SIZE) as usize, false);
        self.stack.clear();

        let root = Walker::new(dictionary);

        let Some(walker) = enter(grid, &self.visited, &root, start)
        else {
            return false;
        };

        self.visited[visited_index(start)] = true;

        self.stack.push(StackEntry {
            pos: start,
            node: walker.node(),
            next_direction: 0,
        });

        loop {
            let depth = self.stack.len();

            let Some(entry) = self.stack.last_mut()
            else {
                break;
            };

            if entry.next_direction >= N_DIRECTIONS ||
                depth >= SEARCH_DEPTH_LIMIT
            {
                // Backtrack
                if let Some(entry) = self.stack.pop() {
                    self.visited[visited_index(entry.pos)] = false;
                }
                continue;
            }

            let next_pos = directions::step(entry.pos, entry.next_direction);
            entry.next_direction += 1;
            let walker = Walker::resume(dictionary, entry.node);

            let Some(next_walker) =
                enter(grid, &self.visited, &walker, next_pos)
            else {
                continue;
            };

            self.visited[visited_index(next_pos)] = true;

            self.stack.push(StackEntry {
                pos: next_pos,
                node: next_walker.node(),
                next_direction: 0,
            });

            if self.stack.len() >= MIN_WORD_LENGTH && next_walker.is_end() {
                self.route.clear();
                self.route.extend(self.stack.iter().map(|entry| entry.pos));
                return true;
            }
        }

        false
    }

    // Returns the route of the first word found. Starting tiles are
    // tried in reading order and neighbors in direction order so the
    // result is always the same for the same grid.
    pub fn find(
        &mut self,
        grid: &Grid,
        dictionary: &Dictionary,
    ) -> Option<&[Position]> {
        for start in grid.positions() {
            if self.find_from_position(grid, dictionary, start) {
                return Some(&self.route);
            }
        }

        None
    }
}

impl Default for Finder {
    fn default() -> Finder {
        Finder::new()
    }
}
