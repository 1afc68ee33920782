// src/io/demand.rs

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Every week has the exact same customer demand.
/// Useful for checking the controller settles without oscillating.
pub fn generate_constant_demand(weeks: usize, value: u32) -> Vec<u32> {
    vec![value; weeks]
}

/// Normally distributed customer demand, rounded and clamped at 0.
///
/// Seeded so a simulation can be replayed exactly. A non-finite or negative
/// `std_dev` degenerates to constant demand at `mean`.
pub fn generate_normal_demand(weeks: usize, mean: f64, std_dev: f64, seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let Ok(normal) = Normal::new(mean, std_dev) else {
        return generate_constant_demand(weeks, mean.max(0.0).round() as u32);
    };

    (0..weeks)
        .map(|_| normal.sample(&mut rng).round().max(0.0) as u32)
        .collect()
}

/// The classic MIT beer-game step: 4 units for four weeks, then 8 for the rest.
/// The single step is enough to set off the bullwhip in a naive chain.
pub fn generate_classic_beer_game_demand(weeks: usize) -> Vec<u32> {
    (0..weeks).map(|w| if w < 4 { 4 } else { 8 }).collect()
}
