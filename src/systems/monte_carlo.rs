//! Monte Carlo engine: sample runs up the ladder and average their lengths.
//!
//! A run plays at most `match_ceiling` matches. A run still short of tier 0
//! after that many matches is right-censored: it reports the ceiling as its
//! count and carries `censored = true`. Censoring only ever shortens a run, so
//! whenever any run is censored the reported mean is biased low against the
//! true expectation. `SimulationReport::censored` counts those runs so callers
//! can see the bias instead of trusting the mean blindly.

use rand_core::RngCore;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::{Result, check_probability};
use crate::mechanics::{ladder::Ladder, stoch};
use crate::systems::sdk::Estimator;

/// Outcome of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunRecord {
    pub matches: u32,
    /// Hit the ceiling before reaching tier 0.
    pub censored: bool,
}

/// Play one run from the ladder's start.
pub fn run_once<R: RngCore + ?Sized>(
    ladder: &Ladder,
    p: f64,
    match_ceiling: u32,
    rng: &mut R,
) -> RunRecord {
    let mut state = ladder.start();
    let mut matches = 0u32;
    while !state.is_absorbed() {
        if matches >= match_ceiling {
            return RunRecord { matches, censored: true };
        }
        state = ladder.next(state, stoch::match_result(rng, p));
        matches += 1;
    }
    RunRecord { matches, censored: false }
}

/// Aggregate over all runs of one simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    /// Arithmetic mean of per-run counts, censored runs included at the ceiling.
    pub mean: f64,
    /// Per-run counts, ascending.
    pub sorted_counts: Vec<u32>,
    /// Per-run records in the same order as `sorted_counts`.
    pub runs: Vec<RunRecord>,
    /// Runs that hit the ceiling.
    pub censored: usize,
    pub match_ceiling: u32,
    /// Sample standard deviation over √n. Zero for a single run.
    pub std_error: f64,
}

impl SimulationReport {
    fn from_runs(mut runs: Vec<RunRecord>, match_ceiling: u32) -> Self {
        runs.sort_unstable();
        let n = runs.len() as f64;
        let mean = runs.iter().map(|r| r.matches as f64).sum::<f64>() / n;
        let std_error = if runs.len() > 1 {
            let ss: f64 = runs.iter().map(|r| (r.matches as f64 - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt() / n.sqrt()
        } else {
            0.0
        };
        let censored = runs.iter().filter(|r| r.censored).count();
        let sorted_counts = runs.iter().map(|r| r.matches).collect();
        Self { mean, sorted_counts, runs, censored, match_ceiling, std_error }
    }

    #[inline]
    pub fn samples(&self) -> usize {
        self.runs.len()
    }

    pub fn censored_fraction(&self) -> f64 {
        self.censored as f64 / self.samples() as f64
    }

    /// Nearest-rank quantile of the match counts, `q` clamped to [0, 1].
    pub fn quantile(&self, q: f64) -> u32 {
        let last = self.sorted_counts.len() - 1;
        let idx = (q.clamp(0.0, 1.0) * last as f64).round() as usize;
        self.sorted_counts[idx]
    }

    pub fn median(&self) -> u32 {
        self.quantile(0.5)
    }
}

fn check_inputs(p: f64, samples: usize, match_ceiling: u32) -> Result<()> {
    check_probability(p)?;
    SimulationConfig { samples, match_ceiling, seed: 0 }.validate()
}

fn finish(runs: Vec<RunRecord>, p: f64, match_ceiling: u32) -> SimulationReport {
    let report = SimulationReport::from_runs(runs, match_ceiling);
    if report.censored > 0 {
        tracing::warn!(
            p,
            censored = report.censored,
            samples = report.samples(),
            match_ceiling,
            "runs right-censored at the match ceiling; mean is biased low"
        );
    }
    tracing::debug!(
        p,
        mean = report.mean,
        std_error = report.std_error,
        samples = report.samples(),
        "simulation finished"
    );
    report
}

/// Sample `samples` runs, drawing every outcome from `rng` in order.
pub fn simulate_with<R: RngCore + ?Sized>(
    ladder: &Ladder,
    p: f64,
    samples: usize,
    match_ceiling: u32,
    rng: &mut R,
) -> Result<SimulationReport> {
    check_inputs(p, samples, match_ceiling)?;
    let runs = (0..samples).map(|_| run_once(ladder, p, match_ceiling, rng)).collect();
    Ok(finish(runs, p, match_ceiling))
}

/// Sample with one private stream per run, derived from `cfg.seed`.
///
/// With the `parallel` feature the runs are spread over the rayon pool; the
/// report is identical either way.
pub fn simulate_seeded(ladder: &Ladder, p: f64, cfg: &SimulationConfig) -> Result<SimulationReport> {
    check_inputs(p, cfg.samples, cfg.match_ceiling)?;
    let one = |i: usize| {
        let mut rng = stoch::run_stream(cfg.seed, i as u64);
        run_once(ladder, p, cfg.match_ceiling, &mut rng)
    };

    #[cfg(feature = "parallel")]
    let runs: Vec<RunRecord> = (0..cfg.samples).into_par_iter().map(one).collect();
    #[cfg(not(feature = "parallel"))]
    let runs: Vec<RunRecord> = (0..cfg.samples).map(one).collect();

    Ok(finish(runs, p, cfg.match_ceiling))
}

/// Seeded Monte Carlo as an [`Estimator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MonteCarlo {
    pub config: SimulationConfig,
}

impl MonteCarlo {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Estimator for MonteCarlo {
    fn expected_matches(&self, ladder: &Ladder, p: f64) -> Result<f64> {
        simulate_seeded(ladder, p, &self.config).map(|r| r.mean)
    }
}
