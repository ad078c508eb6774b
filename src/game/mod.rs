// Coin jumping puzzle engine

pub mod board;
pub mod codec;
pub mod engine;

pub use board::{MAX_MOVES, SIDE};
pub use engine::BoardEngine;
