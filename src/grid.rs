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
use serde::Serialize;
use super::config::{GRID_SIZE, PALETTE};
use super::tile::{Tile, TileId, TileKind, TileColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Position {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    tiles: Box<[Tile]>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected {} rows but found {0}", GRID_SIZE)]
    WrongRowCount(usize),
    #[error("row {row} has {count} tiles but expected {}", GRID_SIZE)]
    WrongRowLength { row: usize, count: usize },
    #[error("invalid tile “{0}”")]
    InvalidTile(String),
}

fn index(pos: Position) -> usize {
    (pos.row * GRID_SIZE + pos.col) as usize
}

fn color_suffix(color: TileColor) -> char {
    match color {
        TileColor::Red => 'r',
        TileColor::Blue => 'b',
        TileColor::Green => 'g',
        TileColor::Yellow => 'y',
        TileColor::Purple => 'p',
        TileColor::Wild => '*',
        // Bomb tiles are written as lowercase letters instead
        TileColor::Bomb => '!',
    }
}

fn parse_color(suffix: char) -> Option<TileColor> {
    match suffix {
        'r' => Some(TileColor::Red),
        'b' => Some(TileColor::Blue),
        'g' => Some(TileColor::Green),
        'y' => Some(TileColor::Yellow),
        'p' => Some(TileColor::Purple),
        '*' => Some(TileColor::Wild),
        _ => None,
    }
}

fn parse_tile(token: &str, tile_num: usize) -> Result<TileKind, Error> {
    let invalid = || Error::InvalidTile(token.to_string());

    let mut chars = token.chars();
    let first = chars.next().ok_or_else(invalid)?;
    let suffix = chars.next();

    if chars.next().is_some() {
        return Err(invalid());
    }

    if first == '#' {
        return match suffix {
            None => Ok(TileKind::Blocked),
            Some(_) => Err(invalid()),
        };
    }

    if !first.is_alphabetic() {
        return Err(invalid());
    }

    if first.is_lowercase() {
        return match suffix {
            None => Ok(TileKind::Bomb {
                letter: first.to_uppercase().next().unwrap_or(first),
            }),
            Some(_) => Err(invalid()),
        };
    }

    let color = match suffix {
        None => PALETTE[tile_num % PALETTE.len()],
        Some(suffix) => parse_color(suffix).ok_or_else(invalid)?,
    };

    Ok(TileKind::Normal { letter: first, color })
}

impl Grid {
    // Parses the text form of a grid. Each row is a line and each tile
    // is a whitespace-separated token. An uppercase letter is a normal
    // tile, optionally followed by a color suffix (r, b, g, y, p or *
    // for wild), a lowercase letter is a bomb and # is a blocked tile.
    pub fn new(s: &str) -> Result<Grid, Error> {
        let mut tiles = Vec::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
        let mut n_rows = 0;

        for line in s.lines().filter(|line| !line.trim().is_empty()) {
            let row_start = tiles.len();

            for token in line.split_whitespace() {
                let kind = parse_tile(token, tiles.len())?;
                tiles.push(Tile::new(TileId(tiles.len() as u64), kind));
            }

            let count = tiles.len() - row_start;

            if count != GRID_SIZE as usize {
                return Err(Error::WrongRowLength { row: n_rows, count });
            }

            n_rows += 1;
        }

        if n_rows != GRID_SIZE as usize {
            return Err(Error::WrongRowCount(n_rows));
        }

        Ok(Grid::from_tiles(tiles))
    }

    pub fn from_tiles(tiles: Vec<Tile>) -> Grid {
        assert_eq!(tiles.len(), (GRID_SIZE * GRID_SIZE) as usize);

        Grid {
            tiles: tiles.into_boxed_slice(),
        }
    }

    pub fn size(&self) -> u32 {
        GRID_SIZE
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < GRID_SIZE && pos.col < GRID_SIZE
    }

    pub fn at(&self, pos: Position) -> &Tile {
        assert!(self.contains(pos));

        &self.tiles[index(pos)]
    }

    pub fn at_mut(&mut self, pos: Position) -> &mut Tile {
        assert!(self.contains(pos));

        &mut self.tiles[index(pos)]
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.contains(pos).then(|| &self.tiles[index(pos)])
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|row| {
            (0..GRID_SIZE).map(move |col| Position::new(row, col))
        })
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> {
        self.positions().zip(self.tiles.iter())
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    // Copies out a column from top to bottom
    pub fn column(&self, col: u32) -> Vec<Tile> {
        (0..GRID_SIZE)
            .map(|row| self.at(Position::new(row, col)).clone())
            .collect()
    }

    pub fn set_column(&mut self, col: u32, tiles: Vec<Tile>) {
        assert_eq!(tiles.len(), GRID_SIZE as usize);

        for (row, tile) in tiles.into_iter().enumerate() {
            *self.at_mut(Position::new(row as u32, col)) = tile;
        }
    }

    pub fn word_for(&self, path: &[Position]) -> String {
        path.iter()
            .filter_map(|&pos| self.get(pos).and_then(Tile::letter))
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if col > 0 {
                    write!(f, " ")?;
                }

                match self.at(Position::new(row, col)).kind {
                    TileKind::Normal { letter, color } => {
                        write!(f, "{}{}", letter, color_suffix(color))?;
                    },
                    TileKind::Bomb { letter } => {
                        write!(f, "{}", letter.to_lowercase())?;
                    },
                    TileKind::Blocked => write!(f, "#")?,
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
