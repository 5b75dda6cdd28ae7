//! Facade over the three search variants: picks the requested algorithm(s),
//! enforces the cross-check contract between Generic Dijkstra and brute
//! force, and reports search performance counters to `stats`.

use std::hash::Hash;

use noisy_float::prelude::N64;

use crate::graph::{Edge, Graph, Spectrum, Weighted};
use crate::search::{bf, ee, gd, tracer, PathPairResult};
use crate::units::{AdaptiveUnits, CU};

/// Which algorithm(s) to run. `GenericDijkstra` and `BruteForce` may be
/// requested together (`BruteForce` then cross-checks `GenericDijkstra`);
/// `EdgeExclusion` runs alone.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Algorithm {
    GenericDijkstra,
    GenericDijkstraCrossChecked,
    EdgeExclusion,
}

#[derive(Clone, Copy, Debug)]
pub struct Demand {
    pub src: usize,
    pub dst: usize,
    pub ncu: u32,
}

impl Demand {
    pub fn new(src: usize, dst: usize, ncu: u32) -> Result<Self, crate::error::DemandError> {
        if src == dst {
            return Err(crate::error::DemandError::SameEndpoint(src));
        }
        if ncu == 0 {
            return Err(crate::error::DemandError::NonPositiveUnits);
        }
        Ok(Demand { src, dst, ncu })
    }

    /// Checks that both endpoints are present in `g`. Separate from `new`
    /// because the CLI builds a `Demand` from `--src`/`--dst` before the
    /// network file is read, so the graph to check against isn't available
    /// yet; callers should run this once it is, before searching.
    pub fn check_vertices<N, E>(
        &self,
        g: &Graph<usize, N, E>,
    ) -> Result<(), crate::error::DemandError>
    where
        E: Edge<usize> + Clone + Eq + Hash,
    {
        if !g.has_node(self.src) {
            return Err(crate::error::DemandError::UnknownSource(self.src));
        }
        if !g.has_node(self.dst) {
            return Err(crate::error::DemandError::UnknownDestination(self.dst));
        }
        Ok(())
    }
}

/// The reconstructed path pair (or `None` if no edge-disjoint pair exists)
/// plus the Generic Dijkstra search counters, when that algorithm ran -
/// edge exclusion doesn't track them, since it isn't the algorithm `Stats`
/// reports search-performance counters for.
pub struct SearchOutcome<E> {
    pub pair: Option<PathPairResult<E>>,
    pub stats: Option<gd::SearchStats>,
}

/// Runs the requested algorithm, returning the reconstructed path pair (or
/// `None` if no edge-disjoint pair exists) plus the joint cost.
///
/// When `algorithm` is `GenericDijkstraCrossChecked`, brute force also runs
/// and its joint cost is asserted equal to Generic Dijkstra's - a mismatch
/// is an internal bug and aborts the process, matching the original
/// `routing.cc`'s `abort()` on disagreement.
pub fn search<N, E>(
    g: &Graph<usize, N, E>,
    demand: &Demand,
    start_cu: CU,
    adaptive: AdaptiveUnits,
    algorithm: Algorithm,
) -> SearchOutcome<E>
where
    E: Edge<usize> + Weighted + Spectrum + Clone + Eq + Hash,
{
    match algorithm {
        Algorithm::EdgeExclusion => SearchOutcome {
            pair: ee::search(g, demand.src, demand.dst, demand.ncu, start_cu, adaptive),
            stats: None,
        },
        Algorithm::GenericDijkstra => {
            match gd::search(g, demand.src, demand.dst, demand.ncu, start_cu, adaptive) {
                Some(outcome) => SearchOutcome {
                    pair: Some(tracer::trace(&outcome.terminal, demand.ncu, &adaptive)),
                    stats: Some(outcome.stats),
                },
                None => SearchOutcome {
                    pair: None,
                    stats: None,
                },
            }
        }
        Algorithm::GenericDijkstraCrossChecked => {
            let gd_outcome = gd::search(g, demand.src, demand.dst, demand.ncu, start_cu, adaptive);
            let bf_outcome = bf::search(g, demand.src, demand.dst, demand.ncu, start_cu, adaptive);
            let costs: (Option<N64>, Option<N64>) = (
                gd_outcome.as_ref().map(|o| o.cost),
                bf_outcome.as_ref().map(|o| o.cost),
            );
            assert_eq!(
                costs.0, costs.1,
                "generic dijkstra and brute force disagree on joint cost"
            );
            SearchOutcome {
                pair: gd_outcome
                    .as_ref()
                    .map(|o| tracer::trace(&o.terminal, demand.ncu, &adaptive)),
                stats: gd_outcome.map(|o| o.stats),
            }
        }
    }
}
