//! Board coordinates.

use serde::{Deserialize, Serialize};

/// A row/column coordinate on the board, zero-indexed, row-major.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_new::new,
    derive_more::Display,
)]
#[display("({}, {})", row, col)]
pub struct Position {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}
