/// Ladder mechanics: the one promotion/demotion rule both engines run.
///
/// Monte Carlo drives `Ladder::next` with sampled outcomes; the matrix builder
/// calls it once per (state, outcome) pair. There is no second encoding.
use std::ops::RangeInclusive;

use crate::config::LadderConfig;
use crate::error::{LadderError, Result};

/// A position on the ladder: tier plus signed streak counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    pub rank: u32,
    pub points: i32,
}

impl State {
    /// Tier 0. Once here, nothing moves.
    pub const ABSORBED: State = State { rank: 0, points: 0 };

    #[inline]
    pub fn is_absorbed(&self) -> bool {
        self.rank == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
}

/// Validated rule parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ladder {
    top: u32,
    win: i32,
    lose: i32,
}

impl Ladder {
    pub fn new(cfg: LadderConfig) -> Result<Self> {
        cfg.validate()?;
        let win = i32::try_from(cfg.win_for_rankup).map_err(|_| LadderError::InvalidThreshold {
            name: "win_for_rankup",
            value: cfg.win_for_rankup,
        })?;
        let lose =
            i32::try_from(cfg.lose_for_rankdown).map_err(|_| LadderError::InvalidThreshold {
                name: "lose_for_rankdown",
                value: cfg.lose_for_rankdown,
            })?;
        Ok(Self { top: cfg.rank_original, win, lose })
    }

    #[inline]
    pub fn rank_original(&self) -> u32 {
        self.top
    }

    #[inline]
    pub fn win_for_rankup(&self) -> u32 {
        self.win as u32
    }

    #[inline]
    pub fn lose_for_rankdown(&self) -> u32 {
        self.lose as u32
    }

    pub fn config(&self) -> LadderConfig {
        LadderConfig {
            rank_original: self.top,
            win_for_rankup: self.win_for_rankup(),
            lose_for_rankdown: self.lose_for_rankdown(),
        }
    }

    /// `(rank_original, 0)`, or the sentinel itself on a zero-tier ladder.
    #[inline]
    pub fn start(&self) -> State {
        if self.top == 0 {
            State::ABSORBED
        } else {
            State { rank: self.top, points: 0 }
        }
    }

    /// Points a player can hold at `rank`. The starting tier never goes negative.
    pub fn points_range(&self, rank: u32) -> RangeInclusive<i32> {
        if rank == 0 {
            0..=0
        } else if rank == self.top {
            0..=self.win - 1
        } else {
            -(self.lose - 1)..=self.win - 1
        }
    }

    pub fn contains(&self, s: State) -> bool {
        s.rank <= self.top && self.points_range(s.rank).contains(&s.points)
    }

    /// Every non-absorbing state, starting tier first, points ascending.
    pub fn transient_states(&self) -> impl Iterator<Item = State> + '_ {
        (1..=self.top).rev().flat_map(move |rank| {
            self.points_range(rank).map(move |points| State { rank, points })
        })
    }

    /// Transient states plus the sentinel.
    pub fn state_count(&self) -> usize {
        if self.top == 0 {
            return 1;
        }
        let w = self.win as usize;
        let l = self.lose as usize;
        w + (self.top as usize - 1) * (w + l - 1) + 1
    }

    /// Apply one match.
    ///
    /// A win after any losing streak restarts the counter at 1. A loss at
    /// `(rank_original, 0)` is a no-op: the starting tier is the floor. Since
    /// points at the starting tier are never negative, demotion can only fire
    /// below it and the `min` clamp never binds.
    #[inline]
    pub fn next(&self, s: State, result: MatchResult) -> State {
        if s.is_absorbed() {
            return s;
        }
        match result {
            MatchResult::Win => {
                let points = if s.points < 0 { 1 } else { s.points + 1 };
                if points == self.win {
                    State { rank: s.rank - 1, points: 0 }
                } else {
                    State { rank: s.rank, points }
                }
            }
            MatchResult::Loss => {
                if s.rank == self.top && s.points == 0 {
                    return s;
                }
                let points = s.points - 1;
                if points == -self.lose {
                    State { rank: (s.rank + 1).min(self.top), points: 0 }
                } else {
                    State { rank: s.rank, points }
                }
            }
        }
    }
}
