//! Seat assignment for a local match.

use super::info::{PlayerInfo, PlayerKind};
use crate::game::Player;
use crate::observe::ObservableProperty;
use rand::seq::SliceRandom;
use strum::IntoEnumIterator;
use tracing::{info, instrument};

/// The seat id that plays automatically in a local-vs-automated match.
const AUTOMATED_SEAT_ID: u8 = 2;

/// Hands out seats for a local match and publishes the roster.
///
/// Symbols keep their fixed order (Cross moves first); the small integer
/// ids are dealt in shuffled order so neither participant always gets the
/// same id.
#[derive(Debug)]
pub struct PlayerAssigner {
    roster: ObservableProperty<Vec<PlayerInfo>>,
}

impl Default for PlayerAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerAssigner {
    /// Creates an assigner with an empty roster.
    pub fn new() -> Self {
        Self {
            roster: ObservableProperty::new(Vec::new()),
        }
    }

    /// Channel carrying the current roster.
    pub fn roster(&self) -> ObservableProperty<Vec<PlayerInfo>> {
        self.roster.clone()
    }

    /// Seats two humans.
    #[instrument(skip(self))]
    pub fn assign_local_players(&self) {
        self.assign(|_| PlayerKind::Human);
    }

    /// Seats one human and one automated player; whichever seat draws the
    /// automated id plays automatically.
    #[instrument(skip(self))]
    pub fn assign_local_vs_automated(&self) {
        self.assign(|id| {
            if id == AUTOMATED_SEAT_ID {
                PlayerKind::Automated
            } else {
                PlayerKind::Human
            }
        });
    }

    fn assign(&self, kind_for: impl Fn(u8) -> PlayerKind) {
        let mut ids: Vec<u8> = Player::iter().map(Player::id).collect();
        ids.shuffle(&mut rand::rng());
        let roster: Vec<PlayerInfo> = Player::iter()
            .zip(ids)
            .map(|(symbol, id)| PlayerInfo::new(symbol, id, kind_for(id)))
            .collect();
        info!(?roster, "players assigned");
        self.roster.set(roster);
    }
}
