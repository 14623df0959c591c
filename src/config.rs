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

use std::time::Duration;
use super::tile::TileColor;

pub const GRID_SIZE: u32 = 6;

pub const MIN_WORD_LENGTH: usize = 3;
pub const MAX_WORD_LENGTH: usize = 10;

// The deadlock search gives up on a branch once the candidate string
// is this long, regardless of MAX_WORD_LENGTH.
pub const SEARCH_DEPTH_LIMIT: usize = 8;

// Base score indexed by word length. Anything longer than the table
// uses the last entry.
static SCORE_TABLE: [u32; MAX_WORD_LENGTH + 1] = [
    0, 0, 0, 10, 20, 40, 80, 150, 300, 500, 1000,
];

pub const EXPLOSION_BONUS: u32 = 50;
pub const GOLD_MULTIPLIER: u32 = 3;
pub const COLOR_MULTIPLIER: u32 = 2;
pub const GOLD_TIME_BONUS: u32 = 3;
pub const COLOR_TIME_BONUS: u32 = 2;

pub const PALETTE: [TileColor; 5] = [
    TileColor::Red,
    TileColor::Blue,
    TileColor::Green,
    TileColor::Yellow,
    TileColor::Purple,
];

pub const WILD_CHANCE: f64 = 0.08;
pub const BOMB_CHANCE: f64 = 0.08;

// Scrabble letter distribution flattened into a string so that a
// uniform pick from it gives a weighted letter.
pub const LETTER_POOL: &'static str =
    "AAAAAAAAABBCCDDDDEEEEEEEEEEEEFFGGGHHIIIIIIIIIJKLLLLMMNNNNNN\
     OOOOOOOOPPQRRRRRRSSSSTTTTTTUUUUVVWWXYYZ";

pub const TIMED_START_SECONDS: u32 = 60;

pub const INVALID_FLASH_DELAY: Duration = Duration::from_millis(400);
pub const MATCH_SETTLE_DELAY: Duration = Duration::from_millis(300);
pub const REFILL_SETTLE_DELAY: Duration = Duration::from_millis(250);
pub const DEADLOCK_CHECK_DELAY: Duration = Duration::from_millis(500);
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

pub fn base_score(length: usize) -> u32 {
    SCORE_TABLE[length.min(MAX_WORD_LENGTH)]
}

pub fn target_score(level: u32) -> u32 {
    250 * level * (level + 1)
}
