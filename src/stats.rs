//! Simulation statistics, accumulated while clients are established and
//! torn down, printed as `<key> <value>` lines by an explicit call to
//! `report` at the end of a run - unlike `stats.cc`'s destructor, which
//! prints as a side effect of going out of scope.

use noisy_float::prelude::N64;

use crate::graph::{Graph, RoutingEdge};

#[derive(Default)]
pub struct Stats {
    requested: u64,
    established: u64,
    blocked: u64,
    established_cost_sum: f64,
    pq_pops_sum: u64,
    max_pq_size_sum: u64,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    pub fn record_requested(&mut self) {
        self.requested += 1;
    }

    pub fn record_established(&mut self, cost: N64) {
        self.established += 1;
        self.established_cost_sum += cost.raw();
    }

    pub fn record_blocked(&mut self) {
        self.blocked += 1;
    }

    pub fn record_search_stats(&mut self, s: &crate::search::gd::SearchStats) {
        self.pq_pops_sum += s.pops as u64;
        self.max_pq_size_sum += s.max_pq_size as u64;
    }

    pub fn blocking_probability(&self) -> f64 {
        if self.requested == 0 {
            0.0
        } else {
            self.blocked as f64 / self.requested as f64
        }
    }

    pub fn mean_established_cost(&self) -> f64 {
        if self.established == 0 {
            0.0
        } else {
            self.established_cost_sum / self.established as f64
        }
    }

    /// Mean number of disjoint spectrum fragments per edge - higher means
    /// more fragmented, harder-to-allocate spectrum.
    pub fn fragmentation<N>(&self, g: &Graph<usize, N, RoutingEdge>) -> f64 {
        let edges: Vec<&RoutingEdge> = g.edges().collect();
        if edges.is_empty() {
            return 0.0;
        }
        edges.iter().map(|e| e.su.size() as f64).sum::<f64>() / edges.len() as f64
    }

    pub fn report<N>(&self, g: &Graph<usize, N, RoutingEdge>) {
        println!("requested {}", self.requested);
        println!("established {}", self.established);
        println!("blocked {}", self.blocked);
        println!("blocking_probability {}", self.blocking_probability());
        println!("mean_established_cost {}", self.mean_established_cost());
        println!("fragmentation {}", self.fragmentation(g));
        println!("pq_pops_sum {}", self.pq_pops_sum);
        println!("max_pq_size_sum {}", self.max_pq_size_sum);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use noisy_float::prelude::n64;

    #[test]
    fn blocking_probability_with_no_requests_is_zero() {
        let s = Stats::new();
        assert_eq!(s.blocking_probability(), 0.0);
    }

    #[test]
    fn blocking_probability_tracks_ratio() {
        let mut s = Stats::new();
        s.record_requested();
        s.record_requested();
        s.record_established(n64(1.0));
        s.record_blocked();
        assert_eq!(s.blocking_probability(), 0.5);
        assert_eq!(s.mean_established_cost(), 1.0);
    }
}
