//! Discrete-event simulation loop: a single `BinaryHeap` of timestamped
//! events driving client arrivals and departures forward in time, the way
//! the original's `sim.hpp` event loop does.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use noisy_float::prelude::{n64, N64};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::client::Client;
use crate::connection::Connection;
use crate::graph::{Graph, RoutingEdge};
use crate::routing::{Algorithm, Demand};
use crate::stats::Stats;
use crate::traffic::Traffic;
use crate::units::{AdaptiveUnits, CU};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Kind {
    Arrival,
    Departure,
}

struct Event {
    time: N64,
    client_id: u64,
    kind: Kind,
}
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}
impl Eq for Event {}
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.time.cmp(&other.time)
    }
}

fn pick_distinct(nodes: &[usize], rng: &mut impl Rng) -> (usize, usize) {
    assert!(nodes.len() >= 2, "need at least two vertices to pick a demand");
    let i = rng.gen_range(0..nodes.len());
    loop {
        let j = rng.gen_range(0..nodes.len());
        if j != i {
            return (nodes[i], nodes[j]);
        }
    }
}

/// Runs `population` clients' worth of arrivals through `g`, tearing each
/// down after its holding time, and returns the accumulated statistics.
pub fn run(
    g: &mut Graph<usize, (), RoutingEdge>,
    population: u64,
    traffic: &Traffic,
    algorithm: Algorithm,
    start_cu: CU,
    adaptive: AdaptiveUnits,
    seed: u64,
) -> Stats {
    let mut rng = StdRng::seed_from_u64(seed);
    let nodes: Vec<usize> = g.nodes().collect();
    let mut stats = Stats::new();
    let mut established: HashMap<u64, Connection> = HashMap::new();
    let mut heap: BinaryHeap<Reverse<Event>> = BinaryHeap::new();

    let mut arrivals_scheduled: u64 = 1;
    heap.push(Reverse(Event {
        time: n64(traffic.next_arrival_delay(&mut rng)),
        client_id: 0,
        kind: Kind::Arrival,
    }));

    while let Some(Reverse(ev)) = heap.pop() {
        match ev.kind {
            Kind::Arrival => {
                stats.record_requested();
                let (src, dst) = pick_distinct(&nodes, &mut rng);
                let ncu = traffic.sample_units(&mut rng);
                let demand =
                    Demand::new(src, dst, ncu).expect("src != dst by construction, ncu > 0");
                let client = Client {
                    id: ev.client_id,
                    demand,
                    arrival_time: ev.time.raw(),
                    holding_time: traffic.holding_time(&mut rng),
                };
                let conn = Connection::establish(g, client.demand, start_cu, adaptive, algorithm);
                if let Some(s) = &conn.search_stats {
                    stats.record_search_stats(s);
                }
                if conn.is_established() {
                    stats.record_established(conn.cost().unwrap());
                    heap.push(Reverse(Event {
                        time: n64(client.departure_time()),
                        client_id: ev.client_id,
                        kind: Kind::Departure,
                    }));
                    established.insert(ev.client_id, conn);
                } else {
                    stats.record_blocked();
                }
                if arrivals_scheduled < population {
                    let next_time = ev.time + n64(traffic.next_arrival_delay(&mut rng));
                    heap.push(Reverse(Event {
                        time: next_time,
                        client_id: arrivals_scheduled,
                        kind: Kind::Arrival,
                    }));
                    arrivals_scheduled += 1;
                }
            }
            Kind::Departure => {
                if let Some(conn) = established.remove(&ev.client_id) {
                    conn.tear_down(g);
                }
            }
        }
    }
    stats
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::RoutingEdge;
    use crate::units::SU;

    fn ring(n: usize) -> Graph<usize, (), RoutingEdge> {
        let mut g = Graph::new();
        for v in 0..n {
            g.add_node(v, ());
        }
        for v in 0..n {
            g.add_edge(RoutingEdge {
                id: v as u32,
                p1: v,
                p2: (v + 1) % n,
                weight: n64(1.0),
                su: SU::from(CU::new(0, 16)),
            });
        }
        g
    }

    #[test]
    fn simulation_runs_to_completion_and_reports_all_requests() {
        let mut g = ring(6);
        let traffic = Traffic::new(2.0, 3.0, 1.0);
        let adaptive = AdaptiveUnits::new(n64(8.0));
        let stats = run(
            &mut g,
            20,
            &traffic,
            Algorithm::GenericDijkstra,
            CU::new(0, 16),
            adaptive,
            42,
        );
        assert_eq!(stats.blocking_probability() >= 0.0, true);
    }
}
