//! Fixed binary layout for saved games.
//!
//! ```text
//! offset  size  content
//! 0       25    cells, row-major; 0xFF disabled, 0 empty, 1 gold, 2 silver
//! 25      1     solved (0 or 1)
//! 26      1     game over (0 or 1)
//! 27      4     move count, big-endian u32
//! ```
//!
//! The text form is the same bytes in standard base64.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::{
    error::DeserializationError,
    game::{
        board::{Board, MAX_MOVES, SIDE},
        engine::BoardEngine,
    },
    models::CellValue,
};

const CELLS_LEN: usize = SIDE * SIDE;
/// Size of an encoded game in bytes
pub const ENCODED_LEN: usize = CELLS_LEN + 2 + 4;

const CODE_DISABLED: u8 = 0xFF;
const CODE_EMPTY: u8 = 0;
const CODE_GOLD: u8 = 1;
const CODE_SILVER: u8 = 2;

fn cell_code(cell: CellValue) -> u8 {
    match cell {
        CellValue::Disabled => CODE_DISABLED,
        CellValue::Empty => CODE_EMPTY,
        CellValue::CoinGold => CODE_GOLD,
        CellValue::CoinSilver => CODE_SILVER,
    }
}

fn cell_from_code(code: u8) -> Option<CellValue> {
    match code {
        CODE_DISABLED => Some(CellValue::Disabled),
        CODE_EMPTY => Some(CellValue::Empty),
        CODE_GOLD => Some(CellValue::CoinGold),
        CODE_SILVER => Some(CellValue::CoinSilver),
        _ => None,
    }
}

fn flag_from_byte(field: &'static str, value: u8) -> Result<bool, DeserializationError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DeserializationError::Flag { field, value }),
    }
}

pub fn encode(engine: &BoardEngine) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(ENCODED_LEN);

    bytes.extend(engine.board().rows().iter().flatten().map(|cell| cell_code(*cell)));
    bytes.push(engine.is_solved() as u8);
    bytes.push(engine.is_game_over() as u8);
    bytes.extend_from_slice(&engine.move_count().to_be_bytes());

    bytes
}

/// Decode and validate a saved game.
///
/// Besides the framing, the decoded board must have the fixed disabled
/// pattern and a coin population that moves can actually produce, and the
/// flags must agree with the board and the move count.
pub fn decode(bytes: &[u8]) -> Result<BoardEngine, DeserializationError> {
    if bytes.len() != ENCODED_LEN {
        return Err(DeserializationError::Length {
            expected: ENCODED_LEN,
            actual: bytes.len(),
        });
    }

    let (cell_bytes, tail) = bytes.split_at(CELLS_LEN);

    let mut cells = [[CellValue::Disabled; SIDE]; SIDE];
    for (index, &code) in cell_bytes.iter().enumerate() {
        let (x, y) = (index % SIDE, index / SIDE);
        let cell = cell_from_code(code).ok_or(DeserializationError::CellCode { x, y, code })?;

        if (cell == CellValue::Disabled) != Board::is_disabled_position(x, y) {
            return Err(DeserializationError::Layout { x, y });
        }
        cells[y][x] = cell;
    }
    let board = Board::from_cells(cells);

    let gold = board.count(CellValue::CoinGold);
    let silver = board.count(CellValue::CoinSilver);
    let empty = board.count(CellValue::Empty);
    if empty != 1 || gold != silver {
        return Err(DeserializationError::Population {
            gold,
            silver,
            empty,
        });
    }

    let solved = flag_from_byte("solved", tail[0])?;
    let game_over = flag_from_byte("game over", tail[1])?;
    if solved && game_over {
        return Err(DeserializationError::ConflictingFlags);
    }

    let move_count = u32::from_be_bytes([tail[2], tail[3], tail[4], tail[5]]);
    if move_count > MAX_MOVES {
        return Err(DeserializationError::MoveCount(move_count));
    }

    // The win check runs after every move, so the flag always mirrors the board
    if solved != board.is_solved() {
        return Err(DeserializationError::InconsistentState(
            "solved flag does not match the board",
        ));
    }
    // An unsolved game ends exactly when the budget runs out
    if !solved && game_over != (move_count == MAX_MOVES) {
        return Err(DeserializationError::InconsistentState(
            "game over flag does not match the move count",
        ));
    }

    Ok(BoardEngine::from_parts(board, move_count, solved, game_over))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>, DeserializationError> {
    Ok(BASE64.decode(data.trim())?)
}
