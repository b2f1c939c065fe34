use std::time::Duration;

// --- Board geometry ---
pub const WIDTH: usize = 7;
pub const HEIGHT: usize = 6;

/// Number of aligned discs that wins the game.
pub const WIN_RUN_LENGTH: usize = 4;

// --- Score range ---
pub const MAX_SCORE: i32 = (WIDTH * HEIGHT + 1) as i32 / 2 - 3;
pub const MIN_SCORE: i32 = -MAX_SCORE;
pub const DRAW_SCORE: i32 = 0;

// --- Search ---

/// Column exploration order, center first. Center columns take part in more
/// four-in-a-row patterns and produce earlier cutoffs.
pub const MOVE_EXPLORING_ORDER: [usize; WIDTH] = [3, 4, 2, 5, 1, 6, 0];

pub const DEFAULT_SEARCH_DEPTH: u8 = 8;

/// Ascending (timeout ceiling, search depth) pairs. The first ceiling at or
/// above a requested timeout decides the depth; past the last ceiling the
/// default depth applies.
pub const TIMEOUT_DEPTH_MAP: [(Duration, u8); 7] = [
    (Duration::from_millis(1), 1),
    (Duration::from_millis(10), 3),
    (Duration::from_millis(50), 4),
    (Duration::from_millis(100), 4),
    (Duration::from_millis(300), 5),
    (Duration::from_millis(500), 6),
    (Duration::from_millis(3000), 7),
];

// --- Evaluation weights (per pattern, by disc count) ---
pub const SINGLE_PATTERN_WEIGHT: i32 = 0;
pub const PAIR_PATTERN_WEIGHT: i32 = 1;
pub const TRIPLE_PATTERN_WEIGHT: i32 = 4;

// --- Transposition table ---
pub const TT_MAX_ENTRIES: usize = 50_000;
