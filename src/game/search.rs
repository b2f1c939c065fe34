// src/game/search.rs

pub mod pvs;
pub mod tt;

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{
    DEFAULT_SEARCH_DEPTH, MAX_SCORE, MIN_SCORE, PAIR_PATTERN_WEIGHT, SINGLE_PATTERN_WEIGHT,
    TIMEOUT_DEPTH_MAP, TRIPLE_PATTERN_WEIGHT, WIDTH,
};
use crate::error::EngineError;
use crate::game::board::{column_mask, Board};
use crate::game::GameState;
use self::tt::TranspositionTable;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    pub search_depth: u8,
    pub single_pattern_weight: i32,
    pub pair_pattern_weight: i32,
    pub triple_pattern_weight: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            single_pattern_weight: SINGLE_PATTERN_WEIGHT,
            pair_pattern_weight: PAIR_PATTERN_WEIGHT,
            triple_pattern_weight: TRIPLE_PATTERN_WEIGHT,
        }
    }
}

impl SearchConfig {
    /// Default configuration with the tunable parameters jittered, for
    /// evaluation-weight tuning runs.
    pub fn default_with_randomization(rng: &mut impl Rng) -> Self {
        let defaults = Self::default();
        let search_depth = rng.gen_range(4..=defaults.search_depth);

        // +/- 50% variance around the default value
        let mut vary_numeric = |value: i32| -> i32 {
            let factor = rng.gen_range(-0.5..=0.5);
            (value as f64 * (1.0 + factor)).round() as i32
        };

        Self {
            search_depth,
            single_pattern_weight: vary_numeric(defaults.single_pattern_weight),
            pair_pattern_weight: vary_numeric(defaults.pair_pattern_weight),
            triple_pattern_weight: vary_numeric(defaults.triple_pattern_weight),
        }
    }
}

/// Iterative-deepening move finder.
///
/// One [`find_move`](Ai::find_move) call owns the transposition table for
/// its whole duration and resets it on entry; the search itself runs to
/// completion on the calling thread.
pub struct Ai {
    table: TranspositionTable,
    config: SearchConfig,
    depth: u8,
    best_move: Option<usize>,
}

impl Ai {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        let depth = config.search_depth;
        Self {
            table: TranspositionTable::new(),
            config,
            depth,
            best_move: None,
        }
    }

    /// Clears all per-search state.
    pub fn reset(&mut self) {
        self.table.reset();
        self.best_move = None;
        self.depth = self.config.search_depth;
    }

    /// Finds the best column for the position in `game`, reporting every
    /// improving choice through `on_move`. The callback fires at least once
    /// on success and may fire once per completed depth; the last call wins.
    ///
    /// `timeout` is advisory: it is resolved up front to a depth ceiling,
    /// not enforced as a running clock.
    pub fn find_move(
        &mut self,
        game: &GameState,
        mut on_move: impl FnMut(usize),
        timeout: Option<Duration>,
    ) -> Result<(), EngineError> {
        let board = *game.board();

        let valid_moves = board.valid_moves();
        if board.is_full() || valid_moves == 0 {
            return Err(EngineError::NoAvailableMoves);
        }

        self.reset();

        if self.handle_obvious_moves(&board, &mut on_move) {
            return Ok(());
        }

        if let Some(timeout) = timeout {
            self.depth = resolve_search_depth(timeout, self.config.search_depth);
        }
        debug!(depth = self.depth, "searching for a move");

        self.iterative_deepening(&board, &mut on_move);

        // Safety net: no depth produced a principal variation. Not an
        // error; settle for a safe move, or any legal one.
        if self.best_move.is_none() {
            let non_losing = board.non_losing_moves();
            let fallback = if non_losing != 0 {
                non_losing
            } else {
                valid_moves
            };
            if let Some(column) = column_from_bitmask(fallback) {
                debug!(column, "no principal variation found, falling back");
                on_move(column);
            }
        }

        Ok(())
    }

    /// Resolves forced situations without touching the tree search: an
    /// immediate win, a lost position (play anything), or a single safe
    /// reply. Returns true when the move was reported here.
    fn handle_obvious_moves(&mut self, board: &Board, on_move: &mut impl FnMut(usize)) -> bool {
        let winning_moves = board.winning_moves();
        if winning_moves != 0 {
            if let Some(column) = column_from_bitmask(winning_moves) {
                debug!(column, "immediate winning move");
                self.best_move = Some(column);
                on_move(column);
                return true;
            }
        }

        let non_losing = board.non_losing_moves();
        if non_losing == 0 {
            // Nothing prevents the opponent's win; concede with any move.
            if let Some(column) = column_from_bitmask(board.valid_moves()) {
                debug!(column, "position is lost, playing any legal column");
                on_move(column);
                return true;
            }
        }

        if non_losing.count_ones() == 1 {
            if let Some(column) = column_from_bitmask(non_losing) {
                debug!(column, "single safe reply");
                self.best_move = Some(column);
                on_move(column);
                return true;
            }
        }

        false
    }

    fn iterative_deepening(&mut self, board: &Board, on_move: &mut impl FnMut(usize)) {
        for depth in 1..=self.depth {
            let (variation, score) = pvs::cached_search(
                board,
                &mut self.table,
                MIN_SCORE,
                MAX_SCORE,
                depth,
                1,
                &self.config,
            );

            if let Some(&column) = variation.first() {
                trace!(depth, column, score, "deepening iteration complete");
                self.best_move = Some(column);
                on_move(column);
            }
        }
    }
}

impl Default for Ai {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps an advisory timeout onto a bounded search depth: the first table
/// ceiling at or above the timeout decides, anything beyond the last
/// ceiling keeps the default depth.
fn resolve_search_depth(timeout: Duration, default_depth: u8) -> u8 {
    for (ceiling, depth) in TIMEOUT_DEPTH_MAP {
        if timeout <= ceiling {
            return depth;
        }
    }
    default_depth
}

/// First column whose cells intersect `bitmask`.
fn column_from_bitmask(bitmask: u64) -> Option<usize> {
    (0..WIDTH).find(|&column| bitmask & column_mask(column) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::game::board::FULL_BOARD_MASK;

    fn game_from_moves(columns: &[usize]) -> GameState {
        let mut game = GameState::new();
        for &column in columns {
            game.make_move(column).expect("legal test move");
        }
        game
    }

    fn collect_moves(
        game: &GameState,
        timeout: Option<Duration>,
    ) -> Result<Vec<usize>, EngineError> {
        let mut reported = Vec::new();
        let mut ai = Ai::new();
        ai.find_move(game, |column| reported.push(column), timeout)?;
        Ok(reported)
    }

    #[test]
    fn test_resolve_search_depth() {
        let default_depth = DEFAULT_SEARCH_DEPTH;
        let cases = [
            (Duration::from_millis(1), 1),
            (Duration::from_millis(10), 3),
            (Duration::from_millis(40), 4),
            (Duration::from_millis(100), 4),
            (Duration::from_secs(2), 7),
            (Duration::from_secs(10), default_depth),
        ];
        for (timeout, depth) in cases {
            assert_eq!(resolve_search_depth(timeout, default_depth), depth);
        }
    }

    #[test]
    fn test_empty_board_prefers_the_center() {
        tracing_subscriber::fmt().with_test_writer().try_init().ok();

        let game = GameState::new();
        let reported =
            collect_moves(&game, Some(Duration::from_millis(300))).expect("search succeeds");

        assert!(!reported.is_empty());
        assert_eq!(reported[0], 3);
        assert!(reported.iter().all(|&column| column < WIDTH));
    }

    #[test]
    fn test_immediate_win_skips_deepening() {
        // First player has three stacked in column 2 and moves again.
        let game = game_from_moves(&[2, 6, 2, 6, 2, 5]);
        let reported = collect_moves(&game, None).expect("search succeeds");

        // Exactly one report: the shortcut fires before any iteration.
        assert_eq!(reported, vec![2]);
    }

    #[test]
    fn test_lost_position_reports_some_legal_column() {
        // The opponent threatens in two columns at once.
        let game = game_from_moves(&[0, 2, 0, 3, 6, 4]);
        assert_eq!(game.board().non_losing_moves(), 0);

        let reported = collect_moves(&game, None).expect("never an error");
        assert_eq!(reported.len(), 1);
        assert!(game.board().can_play(reported[0]));
    }

    #[test]
    fn test_single_safe_reply_is_forced() {
        // First player threatens at column 3; the reply must block there.
        let game = game_from_moves(&[4, 4, 5, 5, 6]);
        let reported = collect_moves(&game, None).expect("search succeeds");
        assert_eq!(reported, vec![3]);
    }

    #[test]
    fn test_deepening_reports_once_per_depth() {
        let game = game_from_moves(&[3]);
        let reported =
            collect_moves(&game, Some(Duration::from_millis(10))).expect("search succeeds");

        // Depth 3 resolved from the timeout, one report per iteration.
        assert_eq!(reported.len(), 3);
        assert!(reported.iter().all(|&column| game.board().can_play(column)));
    }

    #[test]
    fn test_unplayable_position_is_an_error() {
        let board = Board::from_parts(*FULL_BOARD_MASK, 0, 42, 1);
        let game = GameState::from_board(board);

        let result = collect_moves(&game, None);
        assert!(matches!(result, Err(EngineError::NoAvailableMoves)));
    }

    #[test]
    fn test_randomized_config_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let config = SearchConfig::default_with_randomization(&mut rng);
            assert!((4..=DEFAULT_SEARCH_DEPTH).contains(&config.search_depth));
            assert_eq!(config.single_pattern_weight, 0);
            assert!((1..=2).contains(&config.pair_pattern_weight));
            assert!((2..=6).contains(&config.triple_pattern_weight));
        }
    }
}
