// src/game/search/pvs.rs

//! Principal Variation Search (PVS).
//!
//! PVS is an optimization of the alpha-beta algorithm that improves search
//! efficiency. The first candidate at a node is searched with the full
//! window on the assumption that the center-biased move ordering found the
//! best move early. Every later candidate is first probed with a zero
//! window (beta = alpha + 1) to cheaply prove it inferior; only a probe
//! that beats the current best earns a full re-search. Results are cached
//! in the transposition table on the way out, and cached positions cut the
//! recursion short on the way in.
//!
//! The search is negamax: each node maximizes the negation of the child
//! score, on board copies, so a parent never observes child mutations.

use crate::constants::{DRAW_SCORE, MIN_SCORE, MOVE_EXPLORING_ORDER, WIDTH, HEIGHT};
use crate::game::board::{column_mask, Board};
use crate::game::evaluation;

use super::tt::{EntryDepth, TranspositionTable};
use super::SearchConfig;

/// Searches through the transposition table: returns the cached result on
/// a usable hit, otherwise delegates to [`search`] and caches its result.
pub fn cached_search(
    board: &Board,
    table: &mut TranspositionTable,
    alpha: i32,
    beta: i32,
    depth: u8,
    ply: u8,
    config: &SearchConfig,
) -> (Vec<usize>, i32) {
    let key = board.key();

    let probe = table.lookup(key, alpha, beta, depth);
    if let Some(score) = probe.score {
        return (probe.best_move.into_iter().collect(), score);
    }

    let (variation, score) = search(board, table, alpha, beta, depth, ply, config);
    table.store(
        key,
        &variation,
        score,
        alpha,
        beta,
        EntryDepth::Searched(depth),
    );

    (variation, score)
}

/// Negamax PVS over the non-losing moves of `board`.
///
/// Assumes the side to move cannot win immediately; the driver resolves
/// immediate wins before searching. Returns the principal variation (head =
/// best move now, possibly a fail-low fallback) and its score.
pub fn search(
    board: &Board,
    table: &mut TranspositionTable,
    alpha: i32,
    beta: i32,
    depth: u8,
    ply: u8,
    config: &SearchConfig,
) -> (Vec<usize>, i32) {
    // With every forced line pruned below, the last two cells cannot change
    // the outcome; the position counts as a draw.
    if board.moves_played() >= (WIDTH * HEIGHT) as u32 - 2 {
        return (Vec::new(), DRAW_SCORE);
    }

    let non_losing = board.non_losing_moves();
    if non_losing == 0 {
        // Lost. Dividing by the ply ranks later losses above earlier ones.
        return (Vec::new(), MIN_SCORE / ply as i32);
    }

    if depth == 0 {
        return (Vec::new(), evaluation::evaluate(board, config));
    }

    let mut best_variation: Vec<usize> = Vec::new();
    let mut best_score = alpha;
    let mut explored = 0;

    for column in MOVE_EXPLORING_ORDER {
        let move_mask = non_losing & column_mask(column);
        if move_mask == 0 {
            continue;
        }

        let mut child = *board;
        child.play_mask(move_mask);

        let full_window = explored == 0 || depth == 1 || beta - alpha == 1;
        explored += 1;

        let (variation, child_score) = if full_window {
            cached_search(&child, table, -beta, -best_score, depth - 1, ply + 1, config)
        } else {
            let (_, probe_score) = cached_search(
                &child,
                table,
                -best_score - 1,
                -best_score,
                depth - 1,
                ply + 1,
                config,
            );
            if -probe_score > best_score {
                cached_search(&child, table, -beta, -best_score, depth - 1, ply + 1, config)
            } else {
                continue;
            }
        };

        let score = -child_score;
        if score > best_score {
            best_score = score;
            best_variation = prepend(column, variation);
        } else if best_variation.is_empty() {
            // Keep something playable even under a pure fail-low.
            best_variation = prepend(column, variation);
        }

        if best_score >= beta {
            break;
        }
    }

    (best_variation, best_score)
}

fn prepend(column: usize, mut variation: Vec<usize>) -> Vec<usize> {
    variation.insert(0, column);
    variation
}
