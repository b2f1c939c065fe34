//! Static evaluation of a board position.
//!
//! Every four-in-a-row alignment that holds discs of exactly one player is
//! tallied into that player's histogram by disc count; alignments contested
//! by both players can no longer be completed and are skipped. A completed
//! alignment short-circuits to the score range limit. The histogram weights
//! come from [`SearchConfig`], so they can be tuned per profile.

use crate::constants::{DRAW_SCORE, MAX_SCORE, MIN_SCORE, WIN_RUN_LENGTH};
use crate::game::board::{Board, WINNING_PATTERNS};
use crate::game::search::SearchConfig;

/// Heuristic score of `board`, oriented by the board's side sign.
pub fn evaluate(board: &Board, config: &SearchConfig) -> i32 {
    if board.is_full() {
        return DRAW_SCORE;
    }

    let player = board.player_mask();
    let opponent = board.opponent_mask();
    let sign = board.side_sign();

    let weights = [
        0,
        config.single_pattern_weight,
        config.pair_pattern_weight,
        config.triple_pattern_weight,
        0,
    ];
    let mut player_histogram = [0i32; WIN_RUN_LENGTH + 1];
    let mut opponent_histogram = [0i32; WIN_RUN_LENGTH + 1];

    for &pattern in WINNING_PATTERNS.iter() {
        let player_discs = (pattern & player).count_ones() as usize;
        let opponent_discs = (pattern & opponent).count_ones() as usize;

        if player_discs == 0 && opponent_discs == 0 {
            continue;
        }

        if player_discs == WIN_RUN_LENGTH {
            return MAX_SCORE * sign;
        }
        if opponent_discs == WIN_RUN_LENGTH {
            return MIN_SCORE * sign;
        }

        if opponent_discs == 0 {
            player_histogram[player_discs] += 1;
        } else if player_discs == 0 {
            opponent_histogram[opponent_discs] += 1;
        }
    }

    let mut player_score = 0;
    let mut opponent_score = 0;
    for (bucket, &weight) in weights.iter().enumerate() {
        player_score += player_histogram[bucket] * weight;
        opponent_score += opponent_histogram[bucket] * weight;
    }

    sign * (player_score - opponent_score)
}

#[cfg(test)]
pub mod tests;
