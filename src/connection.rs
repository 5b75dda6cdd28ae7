//! A single established (or blocked) demand: wraps `routing::search` with
//! spectrum reservation on success and release on tear-down.

use noisy_float::prelude::N64;

use crate::graph::{Graph, RoutingEdge};
use crate::routing::{self, Algorithm, Demand};
use crate::search::gd::SearchStats;
use crate::search::PathPairResult;
use crate::units::{AdaptiveUnits, CU};

pub struct Connection {
    pub demand: Demand,
    pair: Option<PathPairResult<RoutingEdge>>,
    pub search_stats: Option<SearchStats>,
}

impl Connection {
    pub fn establish(
        g: &mut Graph<usize, (), RoutingEdge>,
        demand: Demand,
        start_cu: CU,
        adaptive: AdaptiveUnits,
        algorithm: Algorithm,
    ) -> Connection {
        let outcome = routing::search(g, &demand, start_cu, adaptive, algorithm);
        if let Some(p) = &outcome.pair {
            reserve(g, p);
        }
        Connection {
            demand,
            pair: outcome.pair,
            search_stats: outcome.stats,
        }
    }

    pub fn is_established(&self) -> bool {
        self.pair.is_some()
    }

    pub fn cost(&self) -> Option<N64> {
        self.pair.as_ref().map(|p| p.first.cost + p.second.cost)
    }

    pub fn tear_down(self, g: &mut Graph<usize, (), RoutingEdge>) {
        if let Some(p) = &self.pair {
            release(g, p);
        }
    }
}

fn reserve(g: &mut Graph<usize, (), RoutingEdge>, pair: &PathPairResult<RoutingEdge>) {
    for path in [&pair.first, &pair.second] {
        for e in &path.edges {
            let cu = path.cu;
            let id = e.id;
            g.update_edge(e.p1, e.p2, |x| x.id == id, |x| x.su.remove(cu));
        }
    }
}

fn release(g: &mut Graph<usize, (), RoutingEdge>, pair: &PathPairResult<RoutingEdge>) {
    for path in [&pair.first, &pair.second] {
        for e in &path.edges {
            let cu = path.cu;
            let id = e.id;
            g.update_edge(e.p1, e.p2, |x| x.id == id, |x| x.su.insert(cu));
        }
    }
}
