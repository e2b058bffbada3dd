pub mod chest;
pub mod game;

pub use chest::{ChestArcade, ChestOpening, ScoreBoard};
pub use game::{GameService, GameStateView, RollKind, RollResult};
