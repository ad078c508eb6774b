use std::fmt;

use crate::models::{CellValue, Position};

/// Width of each coin wing (`N`)
pub const CELL_COUNT: usize = 3;
/// Side of the square grid holding the diamond (`2N - 1`)
pub const SIDE: usize = CELL_COUNT * 2 - 1;
/// Moves allowed before an unsolved game is over
pub const MAX_MOVES: u32 = 99;

const CENTER: usize = CELL_COUNT - 1;

/// Destination offsets in search order: the four neighbours, then the four
/// cells two steps away.
const JUMP_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (0, -1),
    (1, 0),
    (0, 1),
    (-2, 0),
    (0, -2),
    (2, 0),
    (0, 2),
];

/// Dense `SIDE x SIDE` grid, stored as `cells[y][x]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[CellValue; SIDE]; SIDE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create the starting layout: silver in the upper-right wing, gold in
    /// the lower-left wing, the centre empty.
    pub fn new() -> Self {
        let mut cells = [[CellValue::Disabled; SIDE]; SIDE];

        for (y, row) in cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = Self::starting_cell(x, y);
            }
        }

        Self { cells }
    }

    pub(crate) fn from_cells(cells: [[CellValue; SIDE]; SIDE]) -> Self {
        Self { cells }
    }

    /// Value a cell holds in the starting layout
    pub fn starting_cell(x: usize, y: usize) -> CellValue {
        if Self::is_disabled_position(x, y) {
            CellValue::Disabled
        } else if x == CENTER && y == CENTER {
            CellValue::Empty
        } else if y <= CENTER && x >= CENTER {
            CellValue::CoinSilver
        } else {
            CellValue::CoinGold
        }
    }

    /// Corner blocks outside the diamond
    pub fn is_disabled_position(x: usize, y: usize) -> bool {
        (y < CENTER && x < CENTER) || (y > CENTER && x > CENTER)
    }

    /// Get the cell at `(x, y)`, or `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<CellValue> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn rows(&self) -> &[[CellValue; SIDE]; SIDE] {
        &self.cells
    }

    pub fn count(&self, value: CellValue) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == value)
            .count()
    }

    /// Find where the coin at `(x, y)` would land.
    ///
    /// The first in-bounds empty cell among [`JUMP_OFFSETS`] wins. For
    /// two-step candidates the cell in between is not inspected.
    pub fn jump_target(&self, x: usize, y: usize) -> Option<Position> {
        if !self.get(x, y)?.is_coin() {
            return None;
        }

        JUMP_OFFSETS.iter().find_map(|&(dx, dy)| {
            let tx = x.checked_add_signed(dx)?;
            let ty = y.checked_add_signed(dy)?;
            (self.get(tx, ty)? == CellValue::Empty).then_some(Position { x: tx, y: ty })
        })
    }

    /// Relocate the coin at `(x, y)` to its jump target. Returns the
    /// destination, or `None` with the board untouched.
    pub(crate) fn jump(&mut self, x: usize, y: usize) -> Option<Position> {
        let target = self.jump_target(x, y)?;

        self.cells[target.y][target.x] = self.cells[y][x];
        self.cells[y][x] = CellValue::Empty;

        Some(target)
    }

    /// True once every gold coin has left the gold wing and every silver
    /// coin has left the silver wing. The wings share the centre cell.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().enumerate().all(|(y, row)| {
            row.iter().enumerate().all(|(x, cell)| match cell {
                CellValue::CoinGold => !in_gold_wing(x, y),
                CellValue::CoinSilver => !in_silver_wing(x, y),
                CellValue::Disabled | CellValue::Empty => true,
            })
        })
    }
}

fn in_gold_wing(x: usize, y: usize) -> bool {
    y >= CENTER && x < CELL_COUNT
}

fn in_silver_wing(x: usize, y: usize) -> bool {
    y < CELL_COUNT && x >= CENTER
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let symbol = match cell {
                    CellValue::Disabled => ' ',
                    CellValue::Empty => '.',
                    CellValue::CoinGold => 'G',
                    CellValue::CoinSilver => 'S',
                };
                write!(f, "{}", symbol)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a board from a text picture using the `Display` symbols
    pub(crate) fn board_from(picture: &[&str; SIDE]) -> Board {
        let mut cells = [[CellValue::Disabled; SIDE]; SIDE];
        for (y, line) in picture.iter().enumerate() {
            for (x, symbol) in line.chars().enumerate() {
                cells[y][x] = match symbol {
                    '.' => CellValue::Empty,
                    'G' => CellValue::CoinGold,
                    'S' => CellValue::CoinSilver,
                    _ => CellValue::Disabled,
                };
            }
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_starting_layout() {
        let board = Board::new();
        let expected = ["  SSS", "  SSS", "GG.SS", "GGG  ", "GGG  "].join("\n");
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_starting_counts() {
        let board = Board::new();
        assert_eq!(board.count(CellValue::Empty), 1);
        assert_eq!(board.count(CellValue::Disabled), 8);
        assert_eq!(board.count(CellValue::CoinGold), 8);
        assert_eq!(board.count(CellValue::CoinSilver), 8);
        assert_eq!(board.get(2, 2), Some(CellValue::Empty));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(SIDE, 0), None);
        assert_eq!(board.get(0, SIDE), None);
    }

    #[test]
    fn test_jump_target_priority_prefers_neighbours() {
        // Empty cells both left and two steps up: left wins
        let board = board_from(&["  S.S", "  SSS", "GG.SS", "GGG  ", "GGG  "]);
        assert_eq!(board.jump_target(3, 2), Some(Position { x: 2, y: 2 }));
        // (3, 0) only has empty neighbours: left beats right
        let board = board_from(&["  .S.", "  SSS", "GGGSS", "GGG  ", "GGG  "]);
        assert_eq!(board.jump_target(3, 0), Some(Position { x: 2, y: 0 }));
    }

    #[test]
    fn test_jump_target_two_steps() {
        let board = Board::new();
        // Far-left from (4, 2) reaches the centre
        assert_eq!(board.jump_target(4, 2), Some(Position { x: 2, y: 2 }));
        // Far-up from (2, 4) reaches the centre
        assert_eq!(board.jump_target(2, 4), Some(Position { x: 2, y: 2 }));
    }

    #[test]
    fn test_jump_target_requires_coin() {
        let board = Board::new();
        assert_eq!(board.jump_target(2, 2), None);
        assert_eq!(board.jump_target(0, 0), None);
        assert_eq!(board.jump_target(9, 9), None);
    }

    #[test]
    fn test_boxed_in_coins_have_no_target() {
        let board = Board::new();
        for (x, y) in [(4, 0), (0, 4), (3, 0), (0, 3), (4, 1), (1, 4)] {
            assert_eq!(board.jump_target(x, y), None, "({}, {})", x, y);
        }
    }

    #[test]
    fn test_jump_preserves_color() {
        let mut board = Board::new();
        let target = board.jump(2, 1).unwrap();
        assert_eq!(target, Position { x: 2, y: 2 });
        assert_eq!(board.get(2, 2), Some(CellValue::CoinSilver));
        assert_eq!(board.get(2, 1), Some(CellValue::Empty));
    }

    #[test]
    fn test_solved_predicate() {
        assert!(!Board::new().is_solved());

        let swapped = board_from(&["  GGG", "  GGG", "SS.GG", "SSS  ", "SSS  "]);
        assert!(swapped.is_solved());

        // A coin parked on the shared centre blocks the win
        let centre_gold = board_from(&["  GGG", "  GGG", "SSG.G", "SSS  ", "SSS  "]);
        assert!(!centre_gold.is_solved());
    }
}
