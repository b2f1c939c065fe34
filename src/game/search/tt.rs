// src/game/search/tt.rs

use std::collections::{HashMap, VecDeque};

use crate::constants::TT_MAX_ENTRIES;

/// How a cached score relates to the window it was searched with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// Depth a cached result was computed at. `Solved` marks an exact
/// game-theoretic value that is usable at any requested depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryDepth {
    Solved,
    Searched(u8),
}

#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub best_move: Option<usize>,
    pub depth: EntryDepth,
    pub score: i32,
    pub bound: Bound,
    stamp: u64,
}

/// Result of a table probe. `score` is present only on a usable hit;
/// `best_move` is returned whenever the position is known at all, so the
/// caller can still use it for move ordering on a miss.
#[derive(Clone, Copy, Debug, Default)]
pub struct TtProbe {
    pub score: Option<i32>,
    pub best_move: Option<usize>,
}

/// Bounded cache of search results keyed by position fingerprint.
///
/// Holds at most [`TT_MAX_ENTRIES`] positions; past the cap the single
/// oldest-inserted entry is evicted, in strict insertion order. Re-storing
/// a fingerprint refreshes its insertion position; reads never do.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    table: HashMap<u64, TtEntry>,
    arrivals: VecDeque<(u64, u64)>,
    stamp: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Drops every entry. Called at the start of each top-level search.
    pub fn reset(&mut self) {
        self.table.clear();
        self.arrivals.clear();
    }

    /// Caches a search result, classifying it against the window it was
    /// searched with. A score at or past a window edge is clamped to that
    /// edge and stored as the matching bound.
    ///
    /// # Panics
    ///
    /// Panics when the score matches none of the three bound classes, which
    /// can only happen if the caller hands over an inconsistent window.
    /// That is a bug in the search, not a runtime condition.
    pub fn store(
        &mut self,
        key: u64,
        principal_variation: &[usize],
        mut score: i32,
        alpha: i32,
        beta: i32,
        depth: EntryDepth,
    ) {
        let bound = if depth == EntryDepth::Solved || (alpha < score && score < beta) {
            Bound::Exact
        } else if score >= beta {
            score = beta;
            Bound::Lower
        } else if score <= alpha {
            score = alpha;
            Bound::Upper
        } else {
            panic!("unclassifiable table entry: score {score} against window [{alpha}, {beta}]");
        };

        self.stamp += 1;
        self.table.insert(
            key,
            TtEntry {
                best_move: principal_variation.first().copied(),
                depth,
                score,
                bound,
                stamp: self.stamp,
            },
        );
        self.arrivals.push_back((key, self.stamp));

        if self.table.len() > TT_MAX_ENTRIES {
            self.evict_oldest();
        }
        self.drop_stale_arrivals();
    }

    /// Probes the table. A `Solved` entry always hits; otherwise a hit
    /// requires at least the requested depth and a bound that decides the
    /// current window: an exact score, a lower bound at or above `beta`, or
    /// an upper bound at or below `alpha`.
    pub fn lookup(&self, key: u64, alpha: i32, beta: i32, depth: u8) -> TtProbe {
        let Some(entry) = self.table.get(&key) else {
            return TtProbe::default();
        };

        let hit = match entry.depth {
            EntryDepth::Solved => true,
            EntryDepth::Searched(stored) if stored >= depth => match entry.bound {
                Bound::Exact => true,
                Bound::Lower => entry.score >= beta,
                Bound::Upper => entry.score <= alpha,
            },
            EntryDepth::Searched(_) => false,
        };

        TtProbe {
            score: hit.then_some(entry.score),
            best_move: entry.best_move,
        }
    }

    /// Removes the oldest still-live entry. Arrival records whose stamp no
    /// longer matches the table belong to re-stored keys and are skipped.
    fn evict_oldest(&mut self) {
        while let Some((key, stamp)) = self.arrivals.pop_front() {
            if self.table.get(&key).is_some_and(|entry| entry.stamp == stamp) {
                self.table.remove(&key);
                return;
            }
        }
    }

    /// Trims superseded arrival records off the queue front so the queue
    /// length stays proportional to the live entry count.
    fn drop_stale_arrivals(&mut self) {
        while self.arrivals.len() > self.table.len() {
            match self.arrivals.front() {
                Some(&(key, stamp))
                    if !self
                        .table
                        .get(&key)
                        .is_some_and(|entry| entry.stamp == stamp) =>
                {
                    self.arrivals.pop_front();
                }
                _ => break,
            }
        }
    }
}
