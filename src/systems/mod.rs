pub mod sdk;
#[cfg(feature="system-monte_carlo")] pub mod monte_carlo;
#[cfg(feature="system-absorption")]  pub mod absorption;
#[cfg(all(feature="system-monte_carlo", feature="system-absorption"))] pub mod compare;
