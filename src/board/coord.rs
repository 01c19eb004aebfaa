//! Grid coordinates, players, and ownership.
//!
//! The board is a fixed `BOARD_SIZE x BOARD_SIZE` grid. Player One owns the
//! first `TERRITORY_DEPTH` rows, Player Two the last `TERRITORY_DEPTH`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 10;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

/// Number of rows on each side that belong to a player's territory.
pub const TERRITORY_DEPTH: u8 = 4;

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Coord { x, y }
    }

    /// Returns true if the coordinate lies on the board.
    #[inline]
    pub const fn on_board(self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// Linear index into the board arena. Only meaningful for on-board coordinates.
    #[inline]
    pub const fn index(self) -> usize {
        self.y as usize * BOARD_SIZE as usize + self.x as usize
    }

    /// Inverse of [`Coord::index`].
    #[inline]
    pub const fn from_index(idx: usize) -> Self {
        Coord {
            x: (idx % BOARD_SIZE as usize) as u8,
            y: (idx / BOARD_SIZE as usize) as u8,
        }
    }

    #[inline]
    pub fn manhattan(self, other: Coord) -> u32 {
        (self.x.abs_diff(other.x) as u32) + (self.y.abs_diff(other.y) as u32)
    }

    /// Squared Euclidean distance, which keeps range checks in integers.
    #[inline]
    pub fn distance_sq(self, other: Coord) -> u32 {
        let dx = self.x.abs_diff(other.x) as u32;
        let dy = self.y.abs_diff(other.y) as u32;
        dx * dx + dy * dy
    }

    /// Orthogonal neighbours that lie on the board, in a fixed order
    /// (down, up, left, right).
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        let Coord { x, y } = self;
        [
            (x as i16, y as i16 + 1),
            (x as i16, y as i16 - 1),
            (x as i16 - 1, y as i16),
            (x as i16 + 1, y as i16),
        ]
        .into_iter()
        .filter(|&(nx, ny)| {
            nx >= 0 && ny >= 0 && nx < BOARD_SIZE as i16 && ny < BOARD_SIZE as i16
        })
        .map(|(nx, ny)| Coord::new(nx as u8, ny as u8))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One of the two competing players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

/// Both players in turn order.
pub const ALL_PLAYERS: [Player; 2] = [Player::One, Player::Two];

impl Player {
    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index of this player's inventory slot.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Returns true if the row lies inside this player's home territory.
    pub const fn owns_row(self, y: u8) -> bool {
        match self {
            Player::One => y < TERRITORY_DEPTH,
            Player::Two => y >= BOARD_SIZE - TERRITORY_DEPTH && y < BOARD_SIZE,
        }
    }

    /// Returns true if the row lies in the opponent's half of the board.
    pub const fn is_advanced_row(self, y: u8) -> bool {
        match self {
            Player::One => y >= BOARD_SIZE / 2,
            Player::Two => y < BOARD_SIZE / 2,
        }
    }

    /// Parses the protocol form of a player ("1" or "2").
    pub fn from_protocol(s: &str) -> Option<Player> {
        match s {
            "1" => Some(Player::One),
            "2" => Some(Player::Two),
            _ => None,
        }
    }
}

/// Owner of a structure or inventory: a player or nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Player(Player),
    Neutral,
}

impl Owner {
    /// Index of the owner's inventory slot; neutral is always last.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Owner::Player(p) => p.index(),
            Owner::Neutral => 2,
        }
    }

    #[inline]
    pub const fn player(self) -> Option<Player> {
        match self {
            Owner::Player(p) => Some(p),
            Owner::Neutral => None,
        }
    }
}

impl From<Player> for Owner {
    fn from(p: Player) -> Self {
        Owner::Player(p)
    }
}
