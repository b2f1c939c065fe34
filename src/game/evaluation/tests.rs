//! Unit tests for the pattern-histogram evaluation.

use super::*;
use crate::constants::{DRAW_SCORE, HEIGHT, MAX_SCORE, WIDTH};
use crate::game::board::{cell_mask, Board, FULL_BOARD_MASK};
use crate::game::search::SearchConfig;

fn board_from_moves(columns: &[usize]) -> Board {
    let mut board = Board::new();
    for &column in columns {
        board.play(column);
    }
    board
}

#[test]
fn test_evaluate_empty_board() {
    let board = Board::new();
    let config = SearchConfig::default();
    assert_eq!(evaluate(&board, &config), 0);
}

#[test]
fn test_evaluate_counts_exclusive_pairs() {
    // Mover owns an open pair on the bottom row (three uncontested
    // alignments); the opponent owns one uncontested vertical pair.
    let board = board_from_moves(&[3, 0, 4, 0]);
    let config = SearchConfig::default();
    assert_eq!(evaluate(&board, &config), 2);
}

#[test]
fn test_evaluate_penalizes_opponent_triple() {
    // Opponent stacked three in column 3; the mover's own pair is contested.
    let board = board_from_moves(&[0, 3, 1, 3, 5, 3]);
    let config = SearchConfig::default();
    assert_eq!(evaluate(&board, &config), -5);
}

#[test]
fn test_evaluate_completed_run_saturates() {
    let mover = cell_mask(3, 0) | cell_mask(3, 1) | cell_mask(3, 2) | cell_mask(3, 3);
    let opponent =
        cell_mask(0, 0) | cell_mask(0, 1) | cell_mask(0, 2) | cell_mask(1, 0);
    let board = Board::from_parts(mover | opponent, mover, 8, 1);
    let config = SearchConfig::default();
    assert_eq!(evaluate(&board, &config), MAX_SCORE);
}

#[test]
fn test_evaluate_full_board_is_draw() {
    let board = Board::from_parts(*FULL_BOARD_MASK, 0, (WIDTH * HEIGHT) as u32, 1);
    let config = SearchConfig::default();
    assert_eq!(evaluate(&board, &config), DRAW_SCORE);
}

#[test]
fn test_evaluate_is_antisymmetric_in_the_mover() {
    // Same disc layout viewed from either side scores as exact negations.
    let board = board_from_moves(&[3, 3, 4, 2, 0, 6, 5]);
    let flipped = Board::from_parts(
        board.occupied(),
        board.opponent_mask(),
        board.moves_played(),
        board.side_sign(),
    );
    let config = SearchConfig::default();
    assert_eq!(evaluate(&board, &config), -evaluate(&flipped, &config));
}
