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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Wild,
    Bomb,
}

impl TileColor {
    // True for the colors that can take part in a color match
    pub fn is_palette(self) -> bool {
        !matches!(self, TileColor::Wild | TileColor::Bomb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileStatus {
    Idle,
    Selected,
    ValidPath,
    RejectedPrefix,
    InvalidSubmission,
    Matched,
    Exploded,
}

impl TileStatus {
    pub fn is_removed(self) -> bool {
        matches!(self, TileStatus::Matched | TileStatus::Exploded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TileKind {
    Normal { letter: char, color: TileColor },
    Bomb { letter: char },
    Blocked,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub status: TileStatus,
    pub is_new: bool,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind) -> Tile {
        Tile {
            id,
            kind,
            status: TileStatus::Idle,
            is_new: false,
        }
    }

    pub fn letter(&self) -> Option<char> {
        match self.kind {
            TileKind::Normal { letter, .. } | TileKind::Bomb { letter } => {
                Some(letter)
            },
            TileKind::Blocked => None,
        }
    }

    pub fn color(&self) -> Option<TileColor> {
        match self.kind {
            TileKind::Normal { color, .. } => Some(color),
            TileKind::Bomb { .. } => Some(TileColor::Bomb),
            TileKind::Blocked => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.kind, TileKind::Blocked)
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self.kind, TileKind::Bomb { .. })
    }

    pub fn is_removed(&self) -> bool {
        self.status.is_removed()
    }

    // Whether a player path or the move search may step onto the tile
    pub fn is_selectable(&self) -> bool {
        !self.is_blocked() && !self.is_removed()
    }
}
