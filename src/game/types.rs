//! Core domain types for the grid game.

use serde::{Deserialize, Serialize};

/// Player tag: a closed two-variant symbol paired with a small integer id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, derive_more::Display,
)]
pub enum Player {
    /// The cross player (id 1, goes first).
    #[display("Cross")]
    Cross,
    /// The circle player (id 2).
    #[display("Circle")]
    Circle,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Cross => Player::Circle,
            Player::Circle => Player::Cross,
        }
    }

    /// The integer id paired with this tag.
    pub fn id(self) -> u8 {
        match self {
            Player::Cross => 1,
            Player::Circle => 2,
        }
    }

    /// One-character symbol for display.
    pub fn symbol(self) -> char {
        match self {
            Player::Cross => 'X',
            Player::Circle => 'O',
        }
    }
}

/// Error: an integer tag naming no player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("player tag {} is outside the valid range [1-2]", _0)]
pub struct InvalidPlayer(pub u8);

impl std::error::Error for InvalidPlayer {}

impl TryFrom<u8> for Player {
    type Error = InvalidPlayer;

    /// Boundary validation for integer player tags.
    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Player::Cross),
            2 => Ok(Player::Circle),
            other => Err(InvalidPlayer(other)),
        }
    }
}

/// One cell of the board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing placed here yet.
    #[default]
    Empty,
    /// Cell claimed by a player.
    Occupied(Player),
}

impl Cell {
    /// Whether the cell is unclaimed.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

/// Current state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum GameState {
    /// No game in progress.
    #[display("awaiting")]
    Awaiting,
    /// Game in progress, moves accepted.
    #[display("started")]
    Started,
    /// Game over with a winner.
    #[display("won by {}", _0)]
    Won(Player),
    /// Game over with the board full and no winner.
    #[display("draw")]
    Draw,
}

impl GameState {
    /// Whether the game has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Won(_) | GameState::Draw)
    }
}
