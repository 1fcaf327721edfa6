//! Tactix — a turn-based grid game engine.
//!
//! The engine validates moves, detects wins and draws, supports undo, and
//! forfeits the game of a player who fails to move within the turn timeout.
//! State changes reach the outside world through observable value channels,
//! so views and controllers stay decoupled from the rules.
//!
//! # Architecture
//!
//! - **Engine** ([`GameLogic`]): board, move history, and game state behind
//!   one serialized handle, published through three channels (state, board
//!   snapshot, undo snapshot).
//! - **Notification primitive** ([`ObservableProperty`]): a single current
//!   value plus subscribers notified synchronously on every replacement.
//! - **Turn timer** ([`TurnTimer`]): single-slot cancellable delayed
//!   callback; starting a timer supersedes the pending one.
//! - **Players** ([`MatchDirector`], [`PlayerAssigner`]): seat assignment
//!   and turn direction for local matches, human or automated.
//!
//! # Example
//!
//! ```
//! use tactix::{GameConfig, GameLogic, GameState, Observer, Player, Position};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let logic = GameLogic::new(&GameConfig::default());
//!
//! let states = Observer::new(|state: &GameState| println!("game is now {state}"));
//! let _subscription = logic.game_state().subscribe(&states, false)?;
//!
//! logic.reset_game();
//! logic.make_move(Position::new(0, 0), Player::Cross)?;
//! assert_eq!(logic.game_state().get(), GameState::Started);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod game;
mod observe;
mod players;
mod timer;

pub use config::{ConfigError, ConfigStore, DEFAULT_TURN_TIMEOUT_MS, GameConfig};
pub use game::{
    Board, Cell, DEFAULT_BOARD_SIZE, GameLogic, GameState, InvalidPlayer, MoveError, Player,
    Position, is_winning_move,
};
pub use observe::{ObservableProperty, ObserveError, Observer, Subscription};
pub use players::{MatchDirector, PlayerAssigner, PlayerInfo, PlayerKind, SubmitError, random_move};
pub use timer::{TimerGeneration, TurnTimer};
