//! Game domain: board, players, rules, and the engine.

mod board;
mod engine;
mod position;
mod rules;
mod types;

pub use board::{Board, DEFAULT_BOARD_SIZE};
pub use engine::{GameLogic, MoveError};
pub use position::Position;
pub use rules::is_winning_move;
pub use types::{Cell, GameState, InvalidPlayer, Player};
