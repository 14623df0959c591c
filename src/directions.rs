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

// The grid is square and every tile touches the eight tiles around
// it. The directions are numbered in reading order:
//
// 0 1 2
// 3 . 4
// 5 6 7

use super::grid::Position;

pub const N_DIRECTIONS: u8 = 8;

static OFFSETS: [(i32, i32); N_DIRECTIONS as usize] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

pub fn step(pos: Position, direction: u8) -> Position {
    let (row_off, col_off) = OFFSETS[direction as usize];

    Position {
        row: pos.row.wrapping_add_signed(row_off),
        col: pos.col.wrapping_add_signed(col_off),
    }
}

// Chebyshev distance of exactly one
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a != b && a.row.abs_diff(b.row) <= 1 && a.col.abs_diff(b.col) <= 1
}

pub fn neighbors(pos: Position) -> impl Iterator<Item = Position> {
    (0..N_DIRECTIONS).map(move |direction| step(pos, direction))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn step_all_directions() {
        let pos = Position::new(2, 3);

        assert_eq!(step(pos, 0), Position::new(1, 2));
        assert_eq!(step(pos, 1), Position::new(1, 3));
        assert_eq!(step(pos, 2), Position::new(1, 4));
        assert_eq!(step(pos, 3), Position::new(2, 2));
        assert_eq!(step(pos, 4), Position::new(2, 4));
        assert_eq!(step(pos, 5), Position::new(3, 2));
        assert_eq!(step(pos, 6), Position::new(3, 3));
        assert_eq!(step(pos, 7), Position::new(3, 4));
    }

    #[test]
    fn overflow() {
        // Going off the top or left of the grid should wrap the
        // coordinates around the integer maximum so that the rest of
        // the program can easily detect invalid directions with just
        // a single comparison against the size of the grid.
        assert_eq!(step(Position::new(0, 0), 3), Position::new(0, u32::MAX));
        assert_eq!(step(Position::new(0, 0), 1), Position::new(u32::MAX, 0));
    }

    #[test]
    fn adjacency() {
        let pos = Position::new(2, 2);

        for neighbor in neighbors(pos) {
            assert!(is_adjacent(pos, neighbor));
            assert!(is_adjacent(neighbor, pos));
        }

        assert!(!is_adjacent(pos, pos));
        assert!(!is_adjacent(pos, Position::new(0, 2)));
        assert!(!is_adjacent(pos, Position::new(2, 4)));
        assert!(!is_adjacent(pos, Position::new(4, 4)));
        assert!(!is_adjacent(Position::new(0, 0), Position::new(u32::MAX, 0)));
    }
}
