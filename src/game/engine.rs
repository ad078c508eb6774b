use crate::{
    error::{DeserializationError, GameError},
    game::{
        board::{Board, MAX_MOVES},
        codec,
    },
    models::{CellValue, GameSnapshot, GameStatus, MoveOutcome},
};

/// Owns the board, the move counter and the terminal flags.
///
/// Every gameplay mutation goes through [`BoardEngine::attempt_move`] (or
/// [`BoardEngine::play`]). `solved` and `game_over` are never both set, and
/// once either is set no further move is accepted until the engine is
/// re-initialized or restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEngine {
    board: Board,
    move_count: u32,
    solved: bool,
    game_over: bool,
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardEngine {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            move_count: 0,
            solved: false,
            game_over: false,
        }
    }

    pub(crate) fn from_parts(board: Board, move_count: u32, solved: bool, game_over: bool) -> Self {
        Self {
            board,
            move_count,
            solved,
            game_over,
        }
    }

    /// Reset to the starting layout, discarding any previous state
    pub fn initialize(&mut self) {
        *self = Self::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn query_cell(&self, x: usize, y: usize) -> Result<CellValue, GameError> {
        self.board.get(x, y).ok_or(GameError::OutOfRange { x, y })
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_terminal(&self) -> bool {
        self.solved || self.game_over
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn status(&self) -> GameStatus {
        if self.solved {
            GameStatus::Solved
        } else if self.game_over {
            GameStatus::GameOver
        } else {
            GameStatus::Active
        }
    }

    /// Try to move the coin at `(x, y)`. Returns true if the board changed.
    pub fn attempt_move(&mut self, x: usize, y: usize) -> bool {
        self.play(x, y).is_accepted()
    }

    /// Same as [`BoardEngine::attempt_move`], but reports whether the move
    /// finished the game.
    pub fn play(&mut self, x: usize, y: usize) -> MoveOutcome {
        if self.is_terminal() {
            tracing::debug!("Ignoring move at ({}, {}): game already finished", x, y);
            return MoveOutcome::Rejected;
        }

        let Some(target) = self.board.jump(x, y) else {
            tracing::debug!("No legal move for cell ({}, {})", x, y);
            return MoveOutcome::Rejected;
        };

        self.move_count += 1;
        tracing::debug!(
            "Move {}: ({}, {}) -> ({}, {})\n{}",
            self.move_count,
            x,
            y,
            target.x,
            target.y,
            self.board
        );

        if self.board.is_solved() {
            self.solved = true;
            tracing::info!("Puzzle solved in {} moves", self.move_count);
            MoveOutcome::Solved
        } else if self.move_count >= MAX_MOVES {
            self.game_over = true;
            tracing::info!("Move budget of {} exhausted", MAX_MOVES);
            MoveOutcome::GameOver
        } else {
            MoveOutcome::Moved
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cells: self.board.rows().iter().map(|row| row.to_vec()).collect(),
            move_count: self.move_count,
            moves_left: MAX_MOVES.saturating_sub(self.move_count),
            solved: self.solved,
            game_over: self.game_over,
            status: self.status(),
        }
    }

    /// Encode the full state into the fixed binary layout
    pub fn serialize(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Replace the state with a decoded blob. On error the engine is untouched.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), DeserializationError> {
        *self = codec::decode(bytes)?;
        Ok(())
    }

    /// [`BoardEngine::serialize`] wrapped in base64 for text-only stores
    pub fn to_base64(&self) -> String {
        codec::encode_base64(&self.serialize())
    }

    pub fn from_base64(&mut self, data: &str) -> Result<(), DeserializationError> {
        let bytes = codec::decode_base64(data)?;
        self.deserialize(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::tests::board_from;
    use crate::game::SIDE;

    fn coin_counts(engine: &BoardEngine) -> (usize, usize, usize) {
        let board = engine.board();
        (
            board.count(CellValue::CoinGold),
            board.count(CellValue::CoinSilver),
            board.count(CellValue::Empty),
        )
    }

    /// One move away from the solved position: gold parked in the centre,
    /// the silver-wing cell to its right empty.
    fn almost_solved(move_count: u32) -> BoardEngine {
        let board = board_from(&["  GGG", "  GGG", "SSG.G", "SSS  ", "SSS  "]);
        BoardEngine::from_parts(board, move_count, false, false)
    }

    #[test]
    fn test_fresh_engine() {
        let engine = BoardEngine::new();
        assert_eq!(engine.move_count(), 0);
        assert!(!engine.is_solved());
        assert!(!engine.is_game_over());
        assert!(!engine.is_terminal());
        assert_eq!(engine.status(), GameStatus::Active);
        assert_eq!(coin_counts(&engine), (8, 8, 1));
        assert_eq!(engine.query_cell(2, 2), Ok(CellValue::Empty));
    }

    #[test]
    fn test_initialize_resets_everything() {
        let mut engine = almost_solved(50);
        assert!(engine.attempt_move(2, 2));
        assert!(engine.is_solved());

        engine.initialize();
        assert_eq!(engine, BoardEngine::new());
    }

    #[test]
    fn test_query_cell_out_of_range() {
        let engine = BoardEngine::new();
        assert_eq!(
            engine.query_cell(SIDE, 0),
            Err(GameError::OutOfRange { x: SIDE, y: 0 })
        );
        assert_eq!(engine.query_cell(0, 0), Ok(CellValue::Disabled));
        assert_eq!(engine.query_cell(4, 0), Ok(CellValue::CoinSilver));
        assert_eq!(engine.query_cell(0, 4), Ok(CellValue::CoinGold));
    }

    #[test]
    fn test_move_on_cell_without_coin() {
        let mut engine = BoardEngine::new();
        let before = engine.clone();

        assert!(!engine.attempt_move(2, 2)); // empty
        assert!(!engine.attempt_move(0, 0)); // disabled
        assert!(!engine.attempt_move(4, 4)); // disabled
        assert!(!engine.attempt_move(17, 3)); // off the grid
        assert_eq!(engine, before);
    }

    #[test]
    fn test_boxed_in_coin_is_rejected_every_time() {
        let mut engine = BoardEngine::new();
        let before = engine.clone();

        for _ in 0..10 {
            assert!(!engine.attempt_move(4, 0));
            assert!(!engine.attempt_move(0, 4));
        }
        assert_eq!(engine.move_count(), 0);
        assert_eq!(engine, before);
    }

    #[test]
    fn test_gold_neighbour_moves_into_centre() {
        let mut engine = BoardEngine::new();

        assert!(engine.attempt_move(1, 2));
        assert_eq!(engine.query_cell(2, 2), Ok(CellValue::CoinGold));
        assert_eq!(engine.query_cell(1, 2), Ok(CellValue::Empty));
        assert_eq!(engine.move_count(), 1);
        assert_eq!(engine.status(), GameStatus::Active);
    }

    #[test]
    fn test_move_relocates_exactly_one_coin() {
        let mut engine = BoardEngine::new();
        let before = engine.snapshot();

        assert_eq!(engine.play(3, 2), MoveOutcome::Moved);
        let after = engine.snapshot();

        let changed: Vec<_> = before
            .cells
            .iter()
            .flatten()
            .zip(after.cells.iter().flatten())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(
            changed,
            vec![
                (&CellValue::Empty, &CellValue::CoinSilver),
                (&CellValue::CoinSilver, &CellValue::Empty),
            ]
        );
        assert_eq!(coin_counts(&engine), (8, 8, 1));
    }

    #[test]
    fn test_move_budget_ends_game() {
        let mut engine = BoardEngine::new();

        // Shuffle one coin back and forth through the centre
        for i in 0..MAX_MOVES {
            let (x, y) = if i % 2 == 0 { (1, 2) } else { (2, 2) };
            assert!(engine.attempt_move(x, y), "move {} rejected", i + 1);
            assert_eq!(engine.move_count(), i + 1);
        }

        assert!(engine.is_game_over());
        assert!(!engine.is_solved());
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert_eq!(engine.snapshot().moves_left, 0);

        // Terminal: nothing is accepted any more
        let before = engine.clone();
        for y in 0..SIDE {
            for x in 0..SIDE {
                assert!(!engine.attempt_move(x, y));
            }
        }
        assert_eq!(engine, before);
    }

    #[test]
    fn test_last_budgeted_move_reports_game_over() {
        let mut engine = BoardEngine::from_parts(Board::new(), MAX_MOVES - 1, false, false);
        assert_eq!(engine.play(1, 2), MoveOutcome::GameOver);
        assert_eq!(engine.move_count(), MAX_MOVES);
    }

    #[test]
    fn test_winning_move_solves() {
        let mut engine = almost_solved(41);

        assert_eq!(engine.play(2, 2), MoveOutcome::Solved);
        assert!(engine.is_solved());
        assert!(!engine.is_game_over());
        assert_eq!(engine.move_count(), 42);

        // The coin that just moved cannot move again
        assert!(!engine.attempt_move(3, 2));
        assert_eq!(engine.move_count(), 42);
    }

    #[test]
    fn test_win_on_last_move_is_not_game_over() {
        let mut engine = almost_solved(MAX_MOVES - 1);

        assert_eq!(engine.play(2, 2), MoveOutcome::Solved);
        assert!(engine.is_solved());
        assert!(!engine.is_game_over());
        assert_eq!(engine.move_count(), MAX_MOVES);
    }

    #[test]
    fn test_snapshot_matches_board() {
        let mut engine = BoardEngine::new();
        engine.attempt_move(2, 3);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.cells.len(), SIDE);
        assert!(snapshot.cells.iter().all(|row| row.len() == SIDE));
        assert_eq!(snapshot.cells[2][2], CellValue::CoinGold);
        assert_eq!(snapshot.cells[3][2], CellValue::Empty);
        assert_eq!(snapshot.move_count, 1);
        assert_eq!(snapshot.moves_left, MAX_MOVES - 1);
        assert_eq!(snapshot.status, GameStatus::Active);
    }
}
