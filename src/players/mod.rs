//! Seats, assignment, and turn direction.

mod assign;
mod auto;
mod director;
mod info;

pub use assign::PlayerAssigner;
pub use auto::random_move;
pub use director::{MatchDirector, SubmitError};
pub use info::{PlayerInfo, PlayerKind};
