/*!
`rank_ladder` — expected matches to climb a tiered ranking ladder.

What it models
- A player starts at tier `rank_original` with 0 points and wins each match
  with probability `p`.
- Wins add points; reaching `win_for_rankup` promotes one tier. A win after a
  losing streak restarts the counter at 1.
- Losses subtract points; reaching `-lose_for_rankdown` demotes one tier. The
  starting tier is a floor.
- Tier 0 is the goal and absorbs the chain.

Two engines, one rule
- `systems::monte_carlo` samples runs with an injected generator.
- `systems::absorption` solves the absorbing Markov chain exactly.
- Both reach the rule only through `mechanics::Ladder::next`.

How to use (call surface only)
- `simulate(&mut rng, p, samples, rank_original, win_for_rankup, lose_for_rankdown, match_ceiling)`
  returns a `SimulationReport` (mean, sorted counts, censoring record).
- `expected_matches_to_absorption(p, rank_original, win_for_rankup, lose_for_rankdown)`
  returns the exact expectation.

What it does NOT do
- No sweeping over `p`, no plotting, no CLI. Drive the engines externally.
*/

pub mod config;
pub mod error;
pub mod mechanics;
pub mod systems;

pub use config::{LadderConfig, Settings, SimulationConfig};
pub use error::{LadderError, Result};
pub use mechanics::{Ladder, MatchResult, State};
pub use systems::sdk::Estimator;

#[cfg(feature = "system-monte_carlo")]
pub use systems::monte_carlo::{MonteCarlo, RunRecord, SimulationReport};

#[cfg(feature = "system-absorption")]
pub use systems::absorption::{Absorption, AbsorptionReport};

/// Monte Carlo estimate, all outcomes drawn from `rng`.
#[cfg(feature = "system-monte_carlo")]
pub fn simulate<R: rand_core::RngCore + ?Sized>(
    rng: &mut R,
    p: f64,
    samples: usize,
    rank_original: u32,
    win_for_rankup: u32,
    lose_for_rankdown: u32,
    match_ceiling: u32,
) -> Result<SimulationReport> {
    let ladder = Ladder::new(LadderConfig { rank_original, win_for_rankup, lose_for_rankdown })?;
    systems::monte_carlo::simulate_with(&ladder, p, samples, match_ceiling, rng)
}

/// Exact expected matches from `(rank_original, 0)` to tier 0.
#[cfg(feature = "system-absorption")]
pub fn expected_matches_to_absorption(
    p: f64,
    rank_original: u32,
    win_for_rankup: u32,
    lose_for_rankdown: u32,
) -> Result<f64> {
    let ladder = Ladder::new(LadderConfig { rank_original, win_for_rankup, lose_for_rankdown })?;
    let tm = systems::absorption::build(&ladder, p)?;
    systems::absorption::expected_matches(&tm, ladder.start())
}
