//! Random move selection for automated seats.

use crate::game::{Board, Position};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Picks a uniformly random unclaimed position, `None` when the board is
/// full.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    let free: Vec<Position> = board.empty_positions().collect();
    free.choose(rng).copied()
}
