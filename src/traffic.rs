//! Client arrival and holding-time model: a Poisson process, as the
//! original's `traffic.hpp` generates with `exponential_distribution<>`.

use rand::Rng;
use rand_distr::{Distribution, Exp};

/// Mean client arrival time derived from offered load (in Erlangs), mean
/// holding time, mean requested units and the network's mean shortest-path
/// hop count - the same `calc_mcat` relationship `ddpp.cc` uses to size
/// traffic so that a requested offered load is actually achieved net of how
/// much capacity each connection consumes.
pub fn calc_mcat(offered_load: f64, mean_holding_time: f64, mean_units: f64, mean_hops: f64) -> f64 {
    assert!(offered_load > 0.0, "offered load must be positive");
    mean_holding_time * mean_units * mean_hops / offered_load
}

pub struct Traffic {
    arrival: Exp<f64>,
    holding: Exp<f64>,
    mean_units: f64,
}

impl Traffic {
    pub fn new(mean_client_arrival_time: f64, mean_holding_time: f64, mean_units: f64) -> Self {
        Traffic {
            arrival: Exp::new(1.0 / mean_client_arrival_time).expect("positive mean arrival time"),
            holding: Exp::new(1.0 / mean_holding_time).expect("positive mean holding time"),
            mean_units,
        }
    }

    pub fn next_arrival_delay(&self, rng: &mut impl Rng) -> f64 {
        self.arrival.sample(rng)
    }

    pub fn holding_time(&self, rng: &mut impl Rng) -> f64 {
        self.holding.sample(rng)
    }

    /// Requested units for a new client: Poisson-like, rounded to the
    /// nearest unit and never below 1.
    pub fn sample_units(&self, rng: &mut impl Rng) -> u32 {
        let jitter: f64 = rng.gen_range(0.5..1.5);
        ((self.mean_units * jitter).round() as i64).max(1) as u32
    }
}
