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
use super::config::{
    self, EXPLOSION_BONUS, GOLD_MULTIPLIER, COLOR_MULTIPLIER,
    GOLD_TIME_BONUS, COLOR_TIME_BONUS,
};
use super::directions;
use super::grid::{Grid, Position};
use super::refill::SpecialTile;
use super::session::{Difficulty, Mode, Streaks};
use super::tile::{TileColor, TileStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bonus {
    Gold,
    Color,
}

impl Bonus {
    pub fn multiplier(self) -> u32 {
        match self {
            Bonus::Gold => GOLD_MULTIPLIER,
            Bonus::Color => COLOR_MULTIPLIER,
        }
    }

    pub fn extra_time(self) -> u32 {
        match self {
            Bonus::Gold => GOLD_TIME_BONUS,
            Bonus::Color => COLOR_TIME_BONUS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchOutcome {
    pub word: String,
    pub path: Vec<Position>,
    pub base_score: u32,
    pub bonus: Option<Bonus>,
    pub exploded: Vec<Position>,
    pub explosion_bonus: u32,
    pub total: u32,
    pub time_added: u32,
    pub spawned: Option<SpecialTile>,
}

// Every neighbor of a bomb in the path is destroyed unless it is part
// of the path itself. Blocked tiles can be destroyed this way even
// though they can’t be selected.
pub fn explosion_set(grid: &Grid, path: &[Position]) -> Vec<Position> {
    let mut exploded = Vec::new();

    for &pos in path.iter().filter(|&&pos| grid.at(pos).is_bomb()) {
        for neighbor in directions::neighbors(pos) {
            let Some(tile) = grid.get(neighbor)
            else {
                continue;
            };

            if tile.is_removed() ||
                path.contains(&neighbor) ||
                exploded.contains(&neighbor)
            {
                continue;
            }

            exploded.push(neighbor);
        }
    }

    exploded
}

pub fn classify_bonus(grid: &Grid, path: &[Position]) -> Option<Bonus> {
    let colors = path.iter().filter_map(|&pos| grid.at(pos).color());

    if colors.clone().any(|color| color == TileColor::Wild) {
        return Some(Bonus::Gold);
    }

    let mut palette_colors = colors.filter(|color| color.is_palette());
    let first = palette_colors.next()?;

    palette_colors.all(|color| color == first).then_some(Bonus::Color)
}

pub fn is_short_penalty(length: usize, difficulty: Difficulty) -> bool {
    match difficulty {
        Difficulty::Easy => false,
        Difficulty::Normal => length == 3,
        Difficulty::Hard => length == 3 || length == 4,
    }
}

// Updates the streak counters for a word of the given length and
// returns the special tile that the streak earns, if any.
pub fn update_streaks(
    streaks: &mut Streaks,
    length: usize,
    difficulty: Difficulty,
) -> Option<SpecialTile> {
    if is_short_penalty(length, difficulty) {
        streaks.short += 1;
        streaks.long = 0;
        (streaks.short >= 2).then_some(SpecialTile::Blocked)
    } else if length >= 5 {
        streaks.long += 1;
        streaks.short = 0;
        (streaks.long >= 2).then_some(SpecialTile::Bomb)
    } else {
        *streaks = Streaks::default();
        None
    }
}

// Seconds added in timed mode. The per-letter rate shrinks by 15% a
// level down to a floor of 20%. It is kept in whole percent so that
// the rounding up is exact.
pub fn time_bonus(length: usize, level: u32, bonus: Option<Bonus>) -> u32 {
    let decay = level.saturating_sub(1).saturating_mul(15);
    let percent = 100u32.saturating_sub(decay).max(20);
    let base = (length as u32 * percent).div_ceil(100);

    base + bonus.map(Bonus::extra_time).unwrap_or(0)
}

pub fn resolve(
    grid: &Grid,
    path: &[Position],
    streaks: &mut Streaks,
    difficulty: Difficulty,
    mode: Mode,
    level: u32,
) -> MatchOutcome {
    let word = grid.word_for(path);
    let length = word.chars().count();

    let base_score = config::base_score(length);
    let exploded = explosion_set(grid, path);
    let bonus = classify_bonus(grid, path);
    let multiplier = bonus.map(Bonus::multiplier).unwrap_or(1);
    let explosion_bonus = exploded.len() as u32 * EXPLOSION_BONUS;
    let total = base_score * multiplier + explosion_bonus;

    let spawned = update_streaks(streaks, length, difficulty);

    let time_added = match mode {
        Mode::Timed => time_bonus(length, level, bonus),
        Mode::Casual => 0,
    };

    log::debug!(
        "matched {} for {} ({:?}, {} exploded, spawn {:?})",
        word,
        total,
        bonus,
        exploded.len(),
        spawned,
    );

    MatchOutcome {
        word,
        path: path.to_vec(),
        base_score,
        bonus,
        exploded,
        explosion_bonus,
        total,
        time_added,
        spawned,
    }
}

pub fn mark_removed(grid: &mut Grid, outcome: &MatchOutcome) {
    for &pos in outcome.path.iter() {
        grid.at_mut(pos).status = TileStatus::Matched;
    }

    for &pos in outcome.exploded.iter() {
        grid.at_mut(pos).status = TileStatus::Exploded;
    }
}
