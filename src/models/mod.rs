pub mod game;
pub mod preferences;

pub use game::{CellValue, GameSnapshot, GameStatus, MoveOutcome, Position};
pub use preferences::{BestScore, Preferences};
