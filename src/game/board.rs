// src/game/board.rs

//! Bit-packed representation of the 7x6 board.
//!
//! A position is two masks over one `u64`: `occupied` flags every cell that
//! holds a disc of either player, `current` flags only the discs of the side
//! to move. The opponent mask is `occupied ^ current`. Each column owns
//! `HEIGHT + 1` bits: six playable cells plus a guard bit that keeps column
//! arithmetic from carrying into the neighbour column.
//!
//! ```text
//!  .  .  .  .  .  .  .
//!  5 12 19 26 33 40 47
//!  4 11 18 25 32 39 46
//!  3 10 17 24 31 38 45
//!  2  9 16 23 30 37 44
//!  1  8 15 22 29 36 43
//!  0  7 14 21 28 35 42
//! ```
//!
//! Bit `column * 7 + row`, row 0 at the bottom. The cell directly above bit
//! `b` is `b + 1`.

use std::fmt;

use once_cell::sync::Lazy;

use crate::constants::{HEIGHT, WIDTH, WIN_RUN_LENGTH};

/// Bits per column, including the guard bit above the top cell.
const COLUMN_BITS: usize = HEIGHT + 1;

/// One bit at the bottom cell of every column.
pub static BOTTOM_ROW_MASK: Lazy<u64> =
    Lazy::new(|| (0..WIDTH).fold(0, |mask, column| mask | bottom_mask(column)));

/// All playable cells of the board.
pub static FULL_BOARD_MASK: Lazy<u64> = Lazy::new(|| *BOTTOM_ROW_MASK * ((1u64 << HEIGHT) - 1));

/// Every four-in-a-row alignment on the board, one mask per alignment:
/// 21 vertical, 24 horizontal and 12 per diagonal family, 69 in total.
pub static WINNING_PATTERNS: Lazy<Vec<u64>> = Lazy::new(|| {
    let mut patterns = Vec::new();
    let reach = WIN_RUN_LENGTH as i32 - 1;
    for (dc, dr) in [(0i32, 1i32), (1, 0), (1, 1), (1, -1)] {
        for column in 0..WIDTH as i32 {
            for row in 0..HEIGHT as i32 {
                let (end_column, end_row) = (column + dc * reach, row + dr * reach);
                if !(0..WIDTH as i32).contains(&end_column)
                    || !(0..HEIGHT as i32).contains(&end_row)
                {
                    continue;
                }
                let mut mask = 0;
                for step in 0..WIN_RUN_LENGTH as i32 {
                    mask |= cell_mask((column + dc * step) as usize, (row + dr * step) as usize);
                }
                patterns.push(mask);
            }
        }
    }
    patterns
});

/// Single bit for the cell at `column`, `row` counted from the bottom.
pub fn cell_mask(column: usize, row: usize) -> u64 {
    1u64 << (column * COLUMN_BITS + row)
}

/// All playable cells of one column.
pub fn column_mask(column: usize) -> u64 {
    ((1u64 << HEIGHT) - 1) << (column * COLUMN_BITS)
}

/// Bottom cell of one column.
pub fn bottom_mask(column: usize) -> u64 {
    1u64 << (column * COLUMN_BITS)
}

/// Top playable cell of one column.
pub fn top_mask(column: usize) -> u64 {
    1u64 << (HEIGHT - 1 + column * COLUMN_BITS)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    occupied: u64,
    current: u64,
    moves: u32,
    sign: i32,
}

impl Board {
    pub fn new() -> Self {
        Self {
            occupied: 0,
            current: 0,
            moves: 0,
            sign: 1,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(occupied: u64, current: u64, moves: u32, sign: i32) -> Self {
        Self {
            occupied,
            current,
            moves,
            sign,
        }
    }

    pub fn occupied(&self) -> u64 {
        self.occupied
    }

    /// Discs of the side to move.
    pub fn player_mask(&self) -> u64 {
        self.current
    }

    /// Discs of the side that just moved.
    pub fn opponent_mask(&self) -> u64 {
        self.current ^ self.occupied
    }

    /// +1 on even plies, -1 on odd plies; used to orient evaluation scores.
    pub fn side_sign(&self) -> i32 {
        self.sign
    }

    pub fn moves_played(&self) -> u32 {
        self.moves
    }

    /// True if the side to move has a disc at (`row`, `column`), row 0 at
    /// the top (the rendering coordinate convention).
    pub fn player_disc_at(&self, row: usize, column: usize) -> bool {
        self.current & cell_mask(column, HEIGHT - 1 - row) != 0
    }

    /// True if the side that just moved has a disc at (`row`, `column`),
    /// row 0 at the top.
    pub fn opponent_disc_at(&self, row: usize, column: usize) -> bool {
        self.opponent_mask() & cell_mask(column, HEIGHT - 1 - row) != 0
    }

    /// Whether `column` is in bounds and not full.
    pub fn can_play(&self, column: usize) -> bool {
        column < WIDTH && self.occupied & top_mask(column) == 0
    }

    /// Drops a disc in `column`. The caller guarantees the move is legal;
    /// there is no re-check on this path.
    pub fn play(&mut self, column: usize) {
        let move_mask = (self.occupied + bottom_mask(column)) & column_mask(column);
        self.play_mask(move_mask);
    }

    /// Applies a move given as a one-bit mask at the lowest free cell of
    /// its column, flipping the mover mask and bumping the move counter.
    pub fn play_mask(&mut self, move_mask: u64) {
        self.current ^= self.occupied;
        self.occupied |= move_mask;
        self.moves += 1;
        self.sign = -self.sign;
    }

    /// One bit per non-full column, at its lowest free cell. Adding the
    /// bottom row to `occupied` carries into the next free cell of every
    /// column at once; full columns carry into the guard bit, which the
    /// board mask clears.
    pub fn valid_moves(&self) -> u64 {
        (self.occupied + *BOTTOM_ROW_MASK) & *FULL_BOARD_MASK
    }

    /// Playable cells where the side to move completes four in a row.
    pub fn winning_moves(&self) -> u64 {
        self.valid_moves() & winning_cells(self.current, self.occupied)
    }

    /// Whether dropping a disc in `column` wins for the side to move.
    pub fn is_winning_move(&self, column: usize) -> bool {
        self.valid_moves() & column_mask(column) & winning_cells(self.current, self.occupied) != 0
    }

    /// Playable cells that do not hand the opponent an immediate win.
    ///
    /// Zero means the position is lost: the opponent holds two or more
    /// playable winning cells and no single reply covers them. A single
    /// playable opponent winning cell forces the reply to that cell. The
    /// remaining moves also exclude any cell directly below an opponent
    /// winning cell, which the move would make playable.
    pub fn non_losing_moves(&self) -> u64 {
        let mut valid = self.valid_moves();
        let opponent_wins = winning_cells(self.opponent_mask(), self.occupied);

        let forced = valid & opponent_wins;
        if forced != 0 {
            if forced & (forced - 1) != 0 {
                return 0;
            }
            valid = forced;
        }

        valid & !(opponent_wins >> 1)
    }

    pub fn is_full(&self) -> bool {
        self.occupied == *FULL_BOARD_MASK
    }

    /// Position fingerprint for the transposition table. `occupied` and
    /// `current` together identify a position, and their sum is injective
    /// over reachable positions up to the accepted collision tolerance.
    pub fn key(&self) -> u64 {
        self.occupied + self.current
    }

    /// First and last (row, column) of a completed run of four or more for
    /// the side that just moved, row 0 at the top. Scans cells instead of
    /// shifting masks, so call it only after the fast bit check has
    /// confirmed a win; it exists for rendering and reporting, not for
    /// control flow.
    pub fn winning_coordinates(&self) -> Option<((usize, usize), (usize, usize))> {
        self.vertical_win_lookup()
            .or_else(|| self.horizontal_win_lookup())
            .or_else(|| self.diagonal_win_lookup())
    }

    fn vertical_win_lookup(&self) -> Option<((usize, usize), (usize, usize))> {
        (0..WIDTH).find_map(|column| self.scan_run((0..HEIGHT).map(move |row| (row, column))))
    }

    fn horizontal_win_lookup(&self) -> Option<((usize, usize), (usize, usize))> {
        (0..HEIGHT).find_map(|row| self.scan_run((0..WIDTH).map(move |column| (row, column))))
    }

    fn diagonal_win_lookup(&self) -> Option<((usize, usize), (usize, usize))> {
        for i in 0..HEIGHT + WIDTH - 1 {
            let start_row = i.min(HEIGHT - 1);
            let start_column = i - start_row;
            let length = start_row.min(WIDTH - 1 - start_column) + 1;
            if length < WIN_RUN_LENGTH {
                continue;
            }

            // Rising diagonal and its mirror image.
            let rising = (0..length).map(|j| (start_row - j, start_column + j));
            if let Some(run) = self.scan_run(rising) {
                return Some(run);
            }
            let falling = (0..length).map(|j| (start_row - j, WIDTH - 1 - (start_column + j)));
            if let Some(run) = self.scan_run(falling) {
                return Some(run);
            }
        }
        None
    }

    /// Walks one line of cells and reports the first run of four or more
    /// discs belonging to the side that just moved.
    fn scan_run(
        &self,
        cells: impl Iterator<Item = (usize, usize)>,
    ) -> Option<((usize, usize), (usize, usize))> {
        let mut start = None;
        let mut last = (0, 0);
        let mut count = 0;

        for (row, column) in cells {
            if self.opponent_disc_at(row, column) {
                if start.is_none() {
                    start = Some((row, column));
                }
                last = (row, column);
                count += 1;
            } else {
                if count >= WIN_RUN_LENGTH {
                    break;
                }
                start = None;
                count = 0;
            }
        }

        match start {
            Some(first) if count >= WIN_RUN_LENGTH => Some((first, last)),
            _ => None,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Renders the grid top-down with a column legend, `X` for the side to
    /// move and `O` for the side that just moved.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for column in 0..WIDTH {
            write!(f, " {column}")?;
        }
        for row in 0..HEIGHT {
            write!(f, "\n{row}")?;
            for column in 0..WIDTH {
                let cell = if self.player_disc_at(row, column) {
                    'X'
                } else if self.opponent_disc_at(row, column) {
                    'O'
                } else {
                    '.'
                };
                write!(f, " {cell}")?;
            }
        }
        Ok(())
    }
}

/// Empty cells where dropping a `player` disc completes four in a row,
/// found purely with shifted-AND combinations. The shift distance selects
/// the direction: 1 climbs a column, `HEIGHT + 1` crosses columns on a row,
/// `HEIGHT` and `HEIGHT + 2` follow the two diagonal families.
fn winning_cells(player: u64, occupied: u64) -> u64 {
    // Vertical: three stacked discs complete upwards only.
    let mut mask = (player << 1) & (player << 2) & (player << 3);

    for shift in [COLUMN_BITS as u32, HEIGHT as u32, HEIGHT as u32 + 2] {
        mask |= line_completions(player, shift);
    }

    mask & (*FULL_BOARD_MASK ^ occupied)
}

/// Cells completing a run along one shift direction: either end of three in
/// a row, or the gap inside a broken three.
fn line_completions(player: u64, shift: u32) -> u64 {
    let mut mask = 0;

    let pair = (player >> shift) & (player >> (2 * shift));
    mask |= pair & (player >> (3 * shift));
    mask |= pair & (player << shift);

    let pair = (player << shift) & (player << (2 * shift));
    mask |= pair & (player << (3 * shift));
    mask |= pair & (player >> shift);

    mask
}
