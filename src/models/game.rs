use serde::{Deserialize, Serialize};

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    /// Outside the playable diamond; never changes
    Disabled,
    Empty,
    CoinGold,
    CoinSilver,
}

impl CellValue {
    pub fn is_coin(self) -> bool {
        matches!(self, CellValue::CoinGold | CellValue::CoinSilver)
    }
}

/// Board coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Solved,
    GameOver,
}

/// Result of a single move attempt.
///
/// Clients key their feedback on this (move, win and game over cues).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Nothing changed: the game is over, the cell holds no coin, or the coin is boxed in
    Rejected,
    Moved,
    Solved,
    GameOver,
}

impl MoveOutcome {
    pub fn is_accepted(self) -> bool {
        !matches!(self, MoveOutcome::Rejected)
    }
}

/// Immutable copy of the engine state handed to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Row-major cells, `cells[y][x]`
    pub cells: Vec<Vec<CellValue>>,
    pub move_count: u32,
    pub moves_left: u32,
    pub solved: bool,
    pub game_over: bool,
    pub status: GameStatus,
}
