//! Cross-check: Monte Carlo mean against the exact absorption time.
//!
//! The exact solver is the reference. The z-score uses its standard deviation,
//! so a simulation that censored runs shows up as a large negative z.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::mechanics::ladder::Ladder;
use crate::systems::{absorption, monte_carlo};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agreement {
    pub p: f64,
    pub analytic: f64,
    /// Standard deviation of a single run's match count, from the chain.
    pub analytic_sd: f64,
    pub simulated: f64,
    /// Sample standard error of `simulated`.
    pub std_error: f64,
    /// `(simulated - analytic) / (analytic_sd / √samples)`.
    pub z_score: f64,
    /// `|simulated - analytic| / analytic`, zero when both are zero.
    pub relative_error: f64,
    pub censored: usize,
    pub samples: usize,
}

impl Agreement {
    /// Simulated mean lies within `k` standard errors of the exact value.
    pub fn within_sigma(&self, k: f64) -> bool {
        self.z_score.abs() <= k
    }
}

/// Run both engines on `ladder` at `p` and report how far apart they are.
pub fn compare(ladder: &Ladder, p: f64, cfg: &SimulationConfig) -> Result<Agreement> {
    let exact = absorption::solve(ladder, p)?;
    let sim = monte_carlo::simulate_seeded(ladder, p, cfg)?;

    let diff = sim.mean - exact.expected;
    let se = exact.std_dev() / (sim.samples() as f64).sqrt();
    let tol = 1e-9 * exact.expected.abs().max(1.0);
    let z_score = if se > 0.0 {
        diff / se
    } else if diff.abs() <= tol {
        0.0
    } else {
        diff.signum() * f64::INFINITY
    };
    let relative_error = if exact.expected > 0.0 { diff.abs() / exact.expected } else { diff.abs() };

    let out = Agreement {
        p,
        analytic: exact.expected,
        analytic_sd: exact.std_dev(),
        simulated: sim.mean,
        std_error: sim.std_error,
        z_score,
        relative_error,
        censored: sim.censored,
        samples: sim.samples(),
    };
    tracing::debug!(p, z = out.z_score, rel = out.relative_error, "engines compared");
    Ok(out)
}
