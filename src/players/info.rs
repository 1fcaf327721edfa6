//! Seats at the board.

use crate::game::Player;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// How a seat is controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Controlled by local input.
    Human,
    /// Controlled by the engine's random move picker.
    Automated,
}

/// A seat at the board: symbol tag, session-unique id, controller kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new, Serialize, Deserialize)]
pub struct PlayerInfo {
    symbol: Player,
    id: u8,
    kind: PlayerKind,
}

impl PlayerInfo {
    /// Whether this seat moves on its own.
    pub fn is_automated(&self) -> bool {
        self.kind == PlayerKind::Automated
    }
}
