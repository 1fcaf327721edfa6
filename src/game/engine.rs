//! The game engine: move validation, terminal detection, undo, and
//! timeout-driven forfeiture.

use super::board::Board;
use super::position::Position;
use super::rules;
use super::types::{Cell, GameState, Player};
use crate::config::GameConfig;
use crate::observe::ObservableProperty;
use crate::timer::{TimerGeneration, TurnTimer};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Why a move was refused. `Result::is_ok` is the success/failure signal;
/// the variants only refine it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game is not in progress.
    #[display("game is not in progress")]
    NotStarted,
    /// The position lies outside the board.
    #[display("position {} is outside the board", _0)]
    OutOfBounds(Position),
    /// The cell is already claimed.
    #[display("position {} is already occupied", _0)]
    Occupied(Position),
}

impl std::error::Error for MoveError {}

#[derive(Debug)]
struct Engine {
    board: Board,
    history: Vec<Position>,
    game_state: ObservableProperty<GameState>,
    board_channel: ObservableProperty<Board>,
    undo_channel: ObservableProperty<Board>,
    timer: TurnTimer,
    turn_timeout: Duration,
}

impl Engine {
    /// Timer-driven forfeiture. Runs inside the engine lock; a timer
    /// superseded between waking up and acquiring the lock is discarded
    /// here, as is one that outlived the game it was started for.
    fn handle_timeout(&mut self, generation: TimerGeneration) {
        if !self.timer.is_current(generation) {
            return;
        }
        if self.game_state.get() != GameState::Started {
            return;
        }
        match self.history.pop() {
            None => {
                info!(winner = %Player::Circle, "turn timed out before any move");
                self.game_state.set(GameState::Won(Player::Circle));
            }
            Some(last) => {
                let winner = self
                    .board
                    .get(last)
                    .and_then(Cell::player)
                    .expect("history entries point at occupied cells");
                info!(%winner, "turn timed out; last mover wins by forfeit");
                self.game_state.set(GameState::Won(winner));
            }
        }
    }
}

/// Handle to a game engine instance.
///
/// The engine owns its board, move history, turn timer, and three
/// observable channels. Cloning the handle shares the instance. All
/// mutating operations (including the timeout handler) are serialized
/// through one internal lock; channel notifications run synchronously
/// inside that serialization domain, so subscribers must not call back
/// into mutating operations.
#[derive(Debug, Clone)]
pub struct GameLogic {
    inner: Arc<Mutex<Engine>>,
}

impl GameLogic {
    /// Creates an engine in the awaiting state with an empty board.
    pub fn new(config: &GameConfig) -> Self {
        let board = Board::new(*config.board_size());
        let engine = Engine {
            history: Vec::new(),
            game_state: ObservableProperty::new(GameState::Awaiting),
            board_channel: ObservableProperty::new(board.clone()),
            undo_channel: ObservableProperty::new(board.clone()),
            timer: TurnTimer::new(),
            turn_timeout: Duration::from_millis(*config.turn_timeout_ms()),
            board,
        };
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Channel carrying the current game state.
    ///
    /// Writes through this handle are plain value replacements, not
    /// validated transitions; [`GameLogic::acknowledge_game_end`] is the
    /// named form of the one external write the engine expects.
    pub fn game_state(&self) -> ObservableProperty<GameState> {
        self.inner.lock().unwrap().game_state.clone()
    }

    /// Channel carrying a snapshot of the board after every change.
    pub fn game_board(&self) -> ObservableProperty<Board> {
        self.inner.lock().unwrap().board_channel.clone()
    }

    /// Channel carrying a board snapshot, fired only by
    /// [`GameLogic::undo_last_two_moves`].
    pub fn undo_board(&self) -> ObservableProperty<Board> {
        self.inner.lock().unwrap().undo_channel.clone()
    }

    /// Whether `pos` is on the board and unclaimed. Pure; ignores whose
    /// turn it is and whether a game is in progress.
    pub fn is_move_legal(&self, pos: Position) -> bool {
        self.inner.lock().unwrap().board.is_empty(pos)
    }

    /// Applies a move for `player` at `pos`.
    ///
    /// On success the move is recorded, the turn timer restarts, the new
    /// board is published, and the state transitions to `Won`/`Draw` when
    /// the move ends the game.
    ///
    /// # Errors
    ///
    /// Refused without any state change when no game is in progress or the
    /// position is out of bounds or occupied.
    #[instrument(skip(self))]
    pub fn make_move(&self, pos: Position, player: Player) -> Result<(), MoveError> {
        let mut engine = self.inner.lock().unwrap();

        let state = engine.game_state.get();
        if state != GameState::Started {
            debug!(%state, "move refused");
            return Err(MoveError::NotStarted);
        }
        if !engine.board.contains(pos) {
            debug!(%pos, "move refused: out of bounds");
            return Err(MoveError::OutOfBounds(pos));
        }
        if !engine.board.is_empty(pos) {
            debug!(%pos, "move refused: occupied");
            return Err(MoveError::Occupied(pos));
        }

        engine.history.push(pos);
        engine.board.set(pos, Cell::Occupied(player));
        self.arm_turn_timer(&mut engine);
        engine.board_channel.set(engine.board.clone());

        if rules::is_winning_move(&engine.board, pos, player) {
            info!(%player, "game won");
            engine.game_state.set(GameState::Won(player));
            return Ok(());
        }
        if engine.history.len() == engine.board.cell_count() {
            info!("game drawn");
            engine.game_state.set(GameState::Draw);
            return Ok(());
        }
        Ok(())
    }

    /// Undoes up to the two most recent moves and publishes the result.
    ///
    /// Two moves are undone because turns alternate strictly: rolling back
    /// a single move against an automated opponent would resume play off a
    /// turn boundary. The undo channel always fires, even when there was
    /// nothing to undo; the main board channel fires only when two moves
    /// were actually rolled back.
    #[instrument(skip(self))]
    pub fn undo_last_two_moves(&self) {
        let mut engine = self.inner.lock().unwrap();
        for _ in 0..2 {
            let Some(last) = engine.history.pop() else {
                engine.undo_channel.set(engine.board.clone());
                return;
            };
            engine.board.clear(last);
        }
        debug!(board = %engine.board, "last two moves undone");
        engine.undo_channel.set(engine.board.clone());
        engine.board_channel.set(engine.board.clone());
    }

    /// Starts a fresh game: empty board, state `Started`, timer running.
    #[instrument(skip(self))]
    pub fn reset_game(&self) {
        let mut engine = self.inner.lock().unwrap();
        engine.game_state.set(GameState::Started);
        self.arm_turn_timer(&mut engine);
        engine.history.clear();
        engine.board.reset();
        engine.board_channel.set(engine.board.clone());
        info!("game reset");
    }

    /// First unclaimed position in row-major order, `None` when the board
    /// is full. Pure.
    pub fn hint_move(&self) -> Option<Position> {
        self.inner.lock().unwrap().board.first_empty()
    }

    /// Returns the engine to the awaiting state after a finished game.
    pub fn acknowledge_game_end(&self) {
        let engine = self.inner.lock().unwrap();
        engine.game_state.set(GameState::Awaiting);
    }

    fn arm_turn_timer(&self, engine: &mut Engine) {
        let weak: Weak<Mutex<Engine>> = Arc::downgrade(&self.inner);
        let timeout = engine.turn_timeout;
        engine.timer.start(timeout, move |generation| {
            let Some(inner) = weak.upgrade() else { return };
            let mut engine = inner.lock().unwrap();
            engine.handle_timeout(generation);
        });
    }
}

impl Default for GameLogic {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
