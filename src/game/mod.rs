// game/mod.rs

pub mod board;
pub mod evaluation;
pub mod search;

use tracing::info;

use crate::constants::WIDTH;
use crate::error::EngineError;
use self::board::Board;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Win(Player),
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Over,
}

/// One Connect-Four game in progress: the canonical position plus the
/// session bookkeeping around it (whose turn it is, whether the game has
/// ended and how).
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    status: GameStatus,
    current: Player,
    result: Option<GameResult>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            status: GameStatus::Playing,
            current: Player::One,
            result: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_board(board: Board) -> Self {
        Self {
            board,
            status: GameStatus::Playing,
            current: Player::One,
            result: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Plays `column` for the current player. The win has to be detected
    /// before the move lands, because applying it flips the mover masks.
    pub fn make_move(&mut self, column: usize) -> Result<(), EngineError> {
        if !self.is_valid_move(column) {
            return Err(EngineError::IllegalMove(column));
        }

        let winning = self.board.is_winning_move(column);
        self.board.play(column);

        if winning {
            self.finish(GameResult::Win(self.current));
        } else if self.board.is_full() {
            self.finish(GameResult::Draw);
        }
        self.current = self.current.other();

        Ok(())
    }

    pub fn is_valid_move(&self, column: usize) -> bool {
        self.status == GameStatus::Playing && self.board.can_play(column)
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        (0..WIDTH)
            .filter(|&column| self.is_valid_move(column))
            .collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The settled outcome, or `None` while the game is still running.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// The side to move. After the game ends this keeps tracking the board,
    /// i.e. the side that would move if play continued.
    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn moves_played(&self) -> u32 {
        self.board.moves_played()
    }

    /// Who owns the disc at (`row`, `column`), row 0 at the top.
    pub fn player_at(&self, row: usize, column: usize) -> Option<Player> {
        if self.board.player_disc_at(row, column) {
            Some(self.current)
        } else if self.board.opponent_disc_at(row, column) {
            Some(self.current.other())
        } else {
            None
        }
    }

    fn finish(&mut self, result: GameResult) {
        self.status = GameStatus::Over;
        self.result = Some(result);
        info!(?result, moves = self.board.moves_played(), "game over");
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = GameState::new();
        assert_eq!(game.current_player(), Player::One);
        assert!(!game.is_game_over());
        assert_eq!(game.result(), None);
        assert_eq!(game.legal_moves(), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_moves_alternate_players() {
        let mut game = GameState::new();
        game.make_move(3).unwrap();
        assert_eq!(game.current_player(), Player::Two);
        assert_eq!(game.player_at(5, 3), Some(Player::One));
        assert_eq!(game.player_at(4, 3), None);

        game.make_move(3).unwrap();
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.player_at(5, 3), Some(Player::One));
        assert_eq!(game.player_at(4, 3), Some(Player::Two));
    }

    #[test]
    fn test_win_ends_the_game() {
        let mut game = GameState::new();
        for &column in &[2, 6, 2, 6, 2, 5] {
            game.make_move(column).unwrap();
        }
        game.make_move(2).unwrap();

        assert!(game.is_game_over());
        assert_eq!(game.result(), Some(GameResult::Win(Player::One)));
        assert_eq!(game.board().winning_coordinates(), Some(((2, 2), (5, 2))));
        assert_eq!(game.legal_moves(), Vec::<usize>::new());
        assert!(matches!(game.make_move(0), Err(EngineError::IllegalMove(0))));
    }

    #[test]
    fn test_out_of_bounds_and_full_columns_are_rejected() {
        let mut game = GameState::new();
        assert!(matches!(game.make_move(9), Err(EngineError::IllegalMove(9))));

        for _ in 0..3 {
            game.make_move(2).unwrap();
            game.make_move(2).unwrap();
        }
        assert!(matches!(game.make_move(2), Err(EngineError::IllegalMove(2))));
        assert!(game.legal_moves().iter().all(|&column| column != 2));
    }
}
