//! Win detection.

use super::board::Board;
use super::position::Position;
use super::types::{Cell, Player};
use tracing::instrument;

/// Checks whether the move just played at `last_move` completed a winning
/// line for `player`.
///
/// Only the four lines through the played cell are scanned — its row, its
/// column, the main diagonal and the anti-diagonal — so the check is O(N)
/// per move. It must always be evaluated against the position just played;
/// a line completed by an earlier move was already detected then.
#[instrument(skip(board))]
pub fn is_winning_move(board: &Board, last_move: Position, player: Player) -> bool {
    let n = board.size();
    let owned = |pos: Position| board.get(pos) == Some(Cell::Occupied(player));

    (0..n).all(|col| owned(Position::new(last_move.row, col)))
        || (0..n).all(|row| owned(Position::new(row, last_move.col)))
        || (0..n).all(|i| owned(Position::new(i, i)))
        || (0..n).all(|i| owned(Position::new(i, n - 1 - i)))
}
