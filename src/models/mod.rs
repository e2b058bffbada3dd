pub mod error;
pub mod reward;
pub mod player;
pub mod achievement;
pub mod leaderboard;
pub mod requests;

pub use error::*;
pub use reward::*;
pub use player::*;
pub use achievement::*;
pub use leaderboard::*;
pub use requests::*;
