//! Absorbing-chain engine: exact expected matches from the fundamental matrix.
//!
//! States are numbered starting tier first, points ascending, with the tier-0
//! sentinel last. `P[i][j]` is the one-match probability of moving from state
//! `i` to state `j`; both targets of every row come from [`Ladder::next`].
//! Dropping the sentinel gives `Q`, and `N = (I - Q)^-1` holds expected visit
//! counts. Row sums of `N` are expected matches to absorption.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::{LadderError, Result, check_probability};
use crate::mechanics::ladder::{Ladder, MatchResult, State};
use crate::mechanics::linalg::Matrix;
use crate::systems::sdk::Estimator;

/// Deterministic numbering of every state on a ladder.
#[derive(Clone, Debug)]
pub struct StateIndex {
    states: Vec<State>,
    lookup: HashMap<State, usize>,
}

impl StateIndex {
    pub fn new(ladder: &Ladder) -> Self {
        let states: Vec<State> =
            ladder.transient_states().chain(std::iter::once(State::ABSORBED)).collect();
        let lookup = states.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        Self { states, lookup }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Always the last index.
    #[inline]
    pub fn absorbing(&self) -> usize {
        self.states.len() - 1
    }

    #[inline]
    pub fn transient(&self) -> Range<usize> {
        0..self.absorbing()
    }

    #[inline]
    pub fn get(&self, s: State) -> Option<usize> {
        self.lookup.get(&s).copied()
    }

    #[inline]
    pub fn state(&self, i: usize) -> State {
        self.states[i]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }
}

/// One-match transition matrix for a fixed `p`.
#[derive(Clone, Debug)]
pub struct TransitionMatrix {
    pub p: f64,
    pub matrix: Matrix,
    pub index: StateIndex,
}

/// Build `P` for `ladder` at win probability `p`.
pub fn build(ladder: &Ladder, p: f64) -> Result<TransitionMatrix> {
    check_probability(p)?;
    let index = StateIndex::new(ladder);
    let mut matrix = Matrix::zeros(index.len());

    for (i, &s) in index.states().iter().enumerate() {
        if s.is_absorbed() {
            matrix[(i, i)] = 1.0;
            continue;
        }
        for (result, prob) in [(MatchResult::Win, p), (MatchResult::Loss, 1.0 - p)] {
            let target = ladder.next(s, result);
            // the rule keeps every target inside the enumeration
            let j = index.lookup[&target];
            matrix[(i, j)] += prob;
        }
    }

    tracing::debug!(p, states = index.len(), "transition matrix built");
    Ok(TransitionMatrix { p, matrix, index })
}

/// `N = (I - Q)^-1` over the transient states.
///
/// `p = 0` is rejected up front: the starting tier can never be left, so
/// `I - Q` has a zero row. Near-zero `p` that is numerically singular fails
/// the same way through the pivot check.
pub fn fundamental_matrix(tm: &TransitionMatrix) -> Result<Matrix> {
    let transient: Vec<usize> = tm.index.transient().collect();
    if tm.p == 0.0 && !transient.is_empty() {
        return Err(LadderError::SingularTransition { p: tm.p });
    }
    tm.matrix
        .submatrix(&transient)
        .identity_minus()
        .inverse()
        .ok_or(LadderError::SingularTransition { p: tm.p })
}

fn transient_position(tm: &TransitionMatrix, s: State) -> Result<usize> {
    match tm.index.get(s) {
        Some(i) if i != tm.index.absorbing() => Ok(i),
        _ => Err(LadderError::UnknownState { rank: s.rank, points: s.points }),
    }
}

/// Expected matches from `start` until tier 0.
pub fn expected_matches(tm: &TransitionMatrix, start: State) -> Result<f64> {
    if start.is_absorbed() {
        return Ok(0.0);
    }
    let i = transient_position(tm, start)?;
    let n = fundamental_matrix(tm)?;
    let t = n.row(i).iter().sum();
    tracing::debug!(p = tm.p, expected = t, "absorption time solved");
    Ok(t)
}

/// Expected visits to each transient state before absorption, from `start`.
pub fn expected_visits(tm: &TransitionMatrix, start: State) -> Result<Vec<(State, f64)>> {
    if start.is_absorbed() {
        return Ok(Vec::new());
    }
    let i = transient_position(tm, start)?;
    let n = fundamental_matrix(tm)?;
    Ok(n.row(i).iter().enumerate().map(|(j, &v)| (tm.index.state(j), v)).collect())
}

/// Mean and variance of the match count to absorption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbsorptionReport {
    pub expected: f64,
    pub variance: f64,
}

impl AbsorptionReport {
    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

/// Mean and variance from one inversion: `t = N·1`, `Var = (2N - I)t - t∘t`.
pub fn absorption_report(tm: &TransitionMatrix, start: State) -> Result<AbsorptionReport> {
    if start.is_absorbed() {
        return Ok(AbsorptionReport { expected: 0.0, variance: 0.0 });
    }
    let i = transient_position(tm, start)?;
    let n = fundamental_matrix(tm)?;
    let t = n.row_sums();
    let nt = n.row(i).iter().zip(&t).map(|(a, b)| a * b).sum::<f64>();
    let expected = t[i];
    let variance = 2.0 * nt - expected - expected * expected;
    Ok(AbsorptionReport { expected, variance })
}

/// Build and solve from the ladder's start.
pub fn solve(ladder: &Ladder, p: f64) -> Result<AbsorptionReport> {
    let tm = build(ladder, p)?;
    absorption_report(&tm, ladder.start())
}

/// The exact solver as an [`Estimator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Absorption;

impl Estimator for Absorption {
    fn expected_matches(&self, ladder: &Ladder, p: f64) -> Result<f64> {
        let tm = build(ladder, p)?;
        expected_matches(&tm, ladder.start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LadderConfig;

    fn ladder(r: u32, w: u32, l: u32) -> Ladder {
        Ladder::new(LadderConfig { rank_original: r, win_for_rankup: w, lose_for_rankdown: l })
            .unwrap()
    }

    #[test]
    fn index_is_deterministic_and_sentinel_last() {
        let lad = ladder(5, 4, 3);
        let a = StateIndex::new(&lad);
        let b = StateIndex::new(&lad);
        assert_eq!(a.states(), b.states());
        assert_eq!(a.len(), 29);
        assert_eq!(a.state(a.absorbing()), State::ABSORBED);
        assert_eq!(a.get(lad.start()), Some(0));
        assert_eq!(a.get(State { rank: 5, points: -1 }), None);
    }

    #[test]
    fn absorbing_row_is_identity() {
        let tm = build(&ladder(3, 2, 2), 0.4).unwrap();
        let a = tm.index.absorbing();
        for j in 0..tm.index.len() {
            assert_eq!(tm.matrix[(a, j)], if j == a { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn rows_follow_the_rule() {
        let lad = ladder(4, 5, 3);
        let p = 0.55;
        let tm = build(&lad, p).unwrap();
        for i in tm.index.transient() {
            let s = tm.index.state(i);
            let w = tm.index.get(lad.next(s, MatchResult::Win)).unwrap();
            let l = tm.index.get(lad.next(s, MatchResult::Loss)).unwrap();
            assert!((tm.matrix[(i, w)] - p).abs() < 1e-15);
            assert!((tm.matrix[(i, l)] - (1.0 - p)).abs() < 1e-15);
        }
    }

    #[test]
    fn single_tier_single_point_is_geometric() {
        // one win needed, losses at the floor are free: E = 1/p, Var = (1-p)/p^2
        let lad = ladder(1, 1, 1);
        let r = solve(&lad, 0.25).unwrap();
        assert!((r.expected - 4.0).abs() < 1e-12);
        assert!((r.variance - 12.0).abs() < 1e-10);
    }

    #[test]
    fn zero_probability_is_singular() {
        let tm = build(&ladder(5, 4, 3), 0.0).unwrap();
        assert_eq!(
            expected_matches(&tm, State { rank: 5, points: 0 }).unwrap_err(),
            LadderError::SingularTransition { p: 0.0 }
        );
    }

    #[test]
    fn unknown_start_is_rejected() {
        let tm = build(&ladder(5, 4, 3), 0.5).unwrap();
        assert_eq!(
            expected_matches(&tm, State { rank: 6, points: 0 }).unwrap_err(),
            LadderError::UnknownState { rank: 6, points: 0 }
        );
    }

    #[test]
    fn visits_sum_to_expected_matches() {
        let lad = ladder(5, 4, 3);
        let tm = build(&lad, 0.6).unwrap();
        let visits = expected_visits(&tm, lad.start()).unwrap();
        let total: f64 = visits.iter().map(|(_, v)| v).sum();
        let t = expected_matches(&tm, lad.start()).unwrap();
        assert!((total - t).abs() < 1e-9);
        // the start state is visited at least once
        assert!(visits[0].1 >= 1.0);
    }

    #[test]
    fn zero_tier_ladder_is_already_absorbed() {
        let lad = ladder(0, 4, 3);
        assert_eq!(solve(&lad, 0.0).unwrap(), AbsorptionReport { expected: 0.0, variance: 0.0 });
    }
}
