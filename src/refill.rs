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

use std::collections::VecDeque;
use serde::Serialize;
use super::config::{
    GRID_SIZE, PALETTE, LETTER_POOL, WILD_CHANCE, BOMB_CHANCE,
};
use super::grid::Grid;
use super::session::Mode;
use super::tile::{Tile, TileId, TileKind, TileColor};

// All of the random draws made while generating tiles go through this
// so that tests can script the outcome.
pub trait RandomSource {
    // A uniform value in [0, 1)
    fn roll(&mut self) -> f64;
    // A uniform index in [0, n)
    fn pick(&mut self, n: usize) -> usize;
}

impl<R: rand::Rng> RandomSource for R {
    fn roll(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn pick(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialTile {
    Blocked,
    Bomb,
}

// Tile types that must be generated before falling back to the
// probability model, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SpawnQueue {
    queue: VecDeque<SpecialTile>,
}

impl SpawnQueue {
    pub fn new() -> SpawnQueue {
        SpawnQueue::default()
    }

    pub fn push(&mut self, special: SpecialTile) {
        self.queue.push_back(special);
    }

    pub fn pop(&mut self) -> Option<SpecialTile> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = SpecialTile> + '_ {
        self.queue.iter().copied()
    }
}

pub fn blocked_chance(level: u32, mode: Mode) -> f64 {
    let level = level as f64;

    match mode {
        Mode::Timed => (level * 0.03).min(0.25),
        Mode::Casual => (0.04 + level * 0.01).min(0.20),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RefillReport {
    pub generated: usize,
    pub forced: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TileGenerator {
    next_id: u64,
}

fn random_letter<R: RandomSource + ?Sized>(rng: &mut R) -> char {
    let pos = rng.pick(LETTER_POOL.len());
    // The pool is plain ASCII so a byte index is a letter
    LETTER_POOL.as_bytes()[pos] as char
}

impl TileGenerator {
    pub fn new() -> TileGenerator {
        TileGenerator::default()
    }

    fn next_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn generate<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
        level: u32,
        mode: Mode,
    ) -> Tile {
        let blocked_chance = blocked_chance(level, mode);
        let roll = rng.roll();

        let kind = if roll < blocked_chance {
            TileKind::Blocked
        } else if roll < blocked_chance + BOMB_CHANCE {
            TileKind::Bomb { letter: random_letter(rng) }
        } else {
            let color = if rng.roll() < WILD_CHANCE {
                TileColor::Wild
            } else {
                PALETTE[rng.pick(PALETTE.len())]
            };

            TileKind::Normal { letter: random_letter(rng), color }
        };

        Tile::new(self.next_id(), kind)
    }

    pub fn generate_forced<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
        special: SpecialTile,
    ) -> Tile {
        let kind = match special {
            SpecialTile::Blocked => TileKind::Blocked,
            SpecialTile::Bomb => TileKind::Bomb { letter: random_letter(rng) },
        };

        Tile::new(self.next_id(), kind)
    }

    // Builds the starting grid. None of the tiles are marked as new
    // and the spawn queue is never used.
    pub fn fill_grid<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
        mode: Mode,
    ) -> Grid {
        let tiles = (0..GRID_SIZE * GRID_SIZE)
            .map(|_| self.generate(rng, 1, mode))
            .collect::<Vec<_>>();

        Grid::from_tiles(tiles)
    }
}

// Lets the surviving tiles in each column fall to the bottom and
// generates new tiles to fill the gap above them.
pub fn refill<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    generator: &mut TileGenerator,
    rng: &mut R,
    spawn_queue: &mut SpawnQueue,
    level: u32,
    mode: Mode,
) -> RefillReport {
    let mut report = RefillReport::default();

    for col in 0..GRID_SIZE {
        let survivors = grid.column(col)
            .into_iter()
            .filter(|tile| !tile.is_removed())
            .map(|mut tile| {
                tile.is_new = false;
                tile
            })
            .collect::<Vec<_>>();

        let needed = GRID_SIZE as usize - survivors.len();
        let mut column = Vec::with_capacity(GRID_SIZE as usize);

        for _ in 0..needed {
            let mut tile = match spawn_queue.pop() {
                Some(special) => {
                    report.forced += 1;
                    generator.generate_forced(rng, special)
                },
                None => generator.generate(rng, level, mode),
            };

            tile.is_new = true;
            column.push(tile);
        }

        report.generated += needed;
        column.extend(survivors);

        grid.set_column(col, column);
    }

    log::debug!(
        "refilled {} tiles ({} forced, {} still queued)",
        report.generated,
        report.forced,
        spawn_queue.len(),
    );

    report
}
