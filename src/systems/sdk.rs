// src/systems/sdk.rs

//! # Systems SDK
//!
//! The two estimators of "matches needed to reach tier 0" live under
//! `src/systems/*`, each behind its own feature:
//! - **monte_carlo** (`system-monte_carlo`): samples many runs and averages.
//! - **absorption** (`system-absorption`): exact expectation from the
//!   fundamental matrix of the absorbing chain.
//!
//! Both consume the same [`Ladder`] and reach its rule only through
//! [`Ladder::next`]. A system must never re-derive promotion or demotion on its
//! own; if it needs a transition, it asks the ladder.
//!
//! ## The `Estimator` seam
//! Anything that can turn `(ladder, p)` into an expected match count
//! implements [`Estimator`]. Drivers sweep `p` against `&dyn Estimator` and
//! stay ignorant of which engine answered. Engine-specific extras (the
//! censoring record, variance, visit counts) are on the engine's own report
//! types.
//!
//! ## Determinism
//! - The absorption solver is a pure function of its inputs.
//! - Monte Carlo takes its randomness from the caller, either a generator
//!   passed by `&mut` or a master seed from which each run derives a private
//!   stream. Equal inputs give equal outputs, threaded or not.
//!
//! ## Testing a system
//! - Unit tests next to the code for the mechanics it leans on.
//! - Integration tests at `tests/<topic>.rs` that pin the two engines against
//!   each other and against closed-form cases (`p = 1`).

use crate::error::Result;
use crate::mechanics::ladder::Ladder;

/// An engine that estimates expected matches from the ladder's start to tier 0.
pub trait Estimator {
    fn expected_matches(&self, ladder: &Ladder, p: f64) -> Result<f64>;
}

impl<E: Estimator + ?Sized> Estimator for &E {
    fn expected_matches(&self, ladder: &Ladder, p: f64) -> Result<f64> {
        (**self).expected_matches(ladder, p)
    }
}
