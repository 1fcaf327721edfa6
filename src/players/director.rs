//! Turn direction for a seated match.
//!
//! The director is the composition root for a local match: it wires its own
//! observers onto the engine's channels by direct construction, tracks which
//! seat holds priority, and answers human moves with automated ones.

use super::auto;
use super::info::PlayerInfo;
use crate::game::{Board, GameLogic, GameState, MoveError, Player, Position};
use crate::observe::{ObservableProperty, ObserveError, Observer, Subscription};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

/// Why a submitted move was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SubmitError {
    /// No game is in progress.
    #[display("no game is in progress")]
    NotStarted,
    /// The id names no seat at this board.
    #[display("player {} is not seated at this board", _0)]
    UnknownPlayer(u8),
    /// The seat does not hold priority.
    #[display("player {} does not hold priority", _0)]
    NotYourTurn(u8),
    /// The roster has no opposing seat.
    #[display("no opponent seated")]
    NoOpponent,
    /// The engine refused the move.
    #[display("move refused: {}", _0)]
    Refused(MoveError),
}

impl std::error::Error for SubmitError {}

impl From<MoveError> for SubmitError {
    fn from(err: MoveError) -> Self {
        SubmitError::Refused(err)
    }
}

struct DirectorState {
    roster: Vec<PlayerInfo>,
    /// Seat id currently allowed to move, if any.
    priority: Option<u8>,
}

/// Drives turn order for a seated match over one [`GameLogic`] instance.
///
/// Priority strictly alternates between the two seats; a seat whose kind is
/// automated moves by itself as soon as it gains priority, in the same call
/// that handed priority over, so two moves can never race each other.
pub struct MatchDirector {
    logic: GameLogic,
    state_channel: ObservableProperty<GameState>,
    board_channel: ObservableProperty<Board>,
    state: Arc<Mutex<DirectorState>>,
    _state_sub: Subscription<GameState>,
    _undo_sub: Subscription<Board>,
}

impl MatchDirector {
    /// Wires a director onto `logic` for the given roster.
    ///
    /// # Errors
    ///
    /// Propagates subscription failures from the engine's channels.
    #[instrument(skip(logic, roster))]
    pub fn new(logic: GameLogic, roster: Vec<PlayerInfo>) -> Result<Self, ObserveError> {
        let state = Arc::new(Mutex::new(DirectorState {
            roster,
            priority: None,
        }));

        // Any state other than an in-progress game blocks every seat.
        let on_state = Arc::clone(&state);
        let state_observer = Observer::new(move |game_state: &GameState| {
            if *game_state != GameState::Started {
                on_state.lock().unwrap().priority = None;
            }
        });
        let state_sub = logic.game_state().subscribe(&state_observer, false)?;

        // Undoing all the way back to an empty board hands priority to the
        // starting seat.
        let on_undo = Arc::clone(&state);
        let undo_observer = Observer::new(move |board: &Board| {
            if board.is_clear() {
                let mut state = on_undo.lock().unwrap();
                state.priority = starting_seat(&state.roster);
            }
        });
        let undo_sub = logic.undo_board().subscribe(&undo_observer, false)?;

        Ok(Self {
            state_channel: logic.game_state(),
            board_channel: logic.game_board(),
            logic,
            state,
            _state_sub: state_sub,
            _undo_sub: undo_sub,
        })
    }

    /// The engine this director drives.
    pub fn logic(&self) -> &GameLogic {
        &self.logic
    }

    /// The seat id currently holding priority, if any.
    pub fn priority(&self) -> Option<u8> {
        self.state.lock().unwrap().priority
    }

    /// Starts a fresh game and hands priority to the starting seat; an
    /// automated starting seat opens the game immediately.
    #[instrument(skip(self))]
    pub fn start_match(&self) {
        self.logic.reset_game();
        {
            let mut state = self.state.lock().unwrap();
            state.priority = starting_seat(&state.roster);
        }
        self.drive_automated();
    }

    /// Applies a move from the seat `player_id` at `pos`, then lets any
    /// automated seat respond.
    ///
    /// # Errors
    ///
    /// Refused when no game is in progress, the seat is unknown or lacks
    /// priority, or the engine rejects the move; the submitting seat keeps
    /// priority on refusal.
    #[instrument(skip(self))]
    pub fn submit(&self, player_id: u8, pos: Position) -> Result<(), SubmitError> {
        if self.state_channel.get() != GameState::Started {
            return Err(SubmitError::NotStarted);
        }
        let (mover, next_id) = {
            let state = self.state.lock().unwrap();
            let mover = state
                .roster
                .iter()
                .find(|seat| *seat.id() == player_id)
                .copied()
                .ok_or(SubmitError::UnknownPlayer(player_id))?;
            if state.priority != Some(player_id) {
                return Err(SubmitError::NotYourTurn(player_id));
            }
            let next_id = state
                .roster
                .iter()
                .find(|seat| *seat.id() != player_id)
                .map(|seat| *seat.id())
                .ok_or(SubmitError::NoOpponent)?;
            (mover, next_id)
        };

        self.logic.make_move(pos, *mover.symbol())?;
        debug!(player_id, %pos, "move accepted");
        self.pass_priority(next_id);
        self.drive_automated();
        Ok(())
    }

    fn pass_priority(&self, next_id: u8) {
        let mut state = self.state.lock().unwrap();
        state.priority = if self.state_channel.get() == GameState::Started {
            Some(next_id)
        } else {
            None
        };
    }

    /// Plays for automated seats until a human holds priority or the game
    /// ends. Moves are driven one at a time through the engine, so strict
    /// alternation holds no matter how the seats are controlled.
    fn drive_automated(&self) {
        let mut rng = rand::rng();
        loop {
            if self.state_channel.get() != GameState::Started {
                return;
            }
            let (seat, next_id) = {
                let state = self.state.lock().unwrap();
                let Some(id) = state.priority else { return };
                let Some(seat) = state
                    .roster
                    .iter()
                    .find(|seat| *seat.id() == id)
                    .copied()
                else {
                    return;
                };
                if !seat.is_automated() {
                    return;
                }
                let Some(next_id) = state
                    .roster
                    .iter()
                    .find(|other| *other.id() != id)
                    .map(|other| *other.id())
                else {
                    return;
                };
                (seat, next_id)
            };

            let board = self.board_channel.get();
            let Some(pos) = auto::random_move(&board, &mut rng) else {
                return;
            };
            match self.logic.make_move(pos, *seat.symbol()) {
                Ok(()) => {
                    debug!(seat_id = *seat.id(), %pos, "automated move");
                    self.pass_priority(next_id);
                }
                Err(err) => {
                    warn!(%err, "automated move refused");
                    return;
                }
            }
        }
    }
}

impl std::fmt::Debug for MatchDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchDirector")
            .field("priority", &self.priority())
            .finish_non_exhaustive()
    }
}

/// The seat playing Cross, which always moves first.
fn starting_seat(roster: &[PlayerInfo]) -> Option<u8> {
    roster
        .iter()
        .find(|seat| *seat.symbol() == Player::Cross)
        .map(|seat| *seat.id())
}
