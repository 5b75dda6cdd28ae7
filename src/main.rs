//! CLI for computing edge-disjoint, spectrum-constrained protected path
//! pairs over a generic graph: a single demand (`route`) or a population of
//! clients arriving over time (`simulate`).

use std::collections::VecDeque;

mod cli_args;
mod client;
mod connection;
mod error;
mod graph;
mod label;
mod routing;
mod search;
mod sim;
mod stats;
mod traffic;
mod tree;
mod units;

use error::CliError;
use graph::{Graph, RoutingEdge};
use traffic::{calc_mcat, Traffic};
use units::AdaptiveUnits;

fn read_network(path: &str) -> Result<Graph<usize, (), RoutingEdge>, CliError> {
    let src = std::fs::read_to_string(path).map_err(|e| CliError::ReadNetwork {
        path: path.to_string(),
        source: e,
    })?;
    Ok(graph::load_dot(&src)?)
}

/// Mean shortest-path hop count across all connected ordered vertex pairs,
/// used to size `Traffic` so a requested offered load is actually achieved.
fn mean_hop_count(g: &Graph<usize, (), RoutingEdge>) -> f64 {
    use graph::Edge;
    let mut total = 0u64;
    let mut pairs = 0u64;
    for src in g.nodes() {
        let mut dist = std::collections::HashMap::new();
        dist.insert(src, 0u32);
        let mut queue = VecDeque::new();
        queue.push_back(src);
        while let Some(v) = queue.pop_front() {
            let d = dist[&v];
            for e in g.get_edges(v) {
                let w = e.other(v);
                if !dist.contains_key(&w) {
                    dist.insert(w, d + 1);
                    queue.push_back(w);
                }
            }
        }
        for (&dst, &d) in dist.iter() {
            if dst != src {
                total += d as u64;
                pairs += 1;
            }
        }
    }
    if pairs == 0 {
        1.0
    } else {
        total as f64 / pairs as f64
    }
}

fn run() -> Result<(), CliError> {
    let matches = cli_args::app().get_matches();
    log::info!("Loading...");

    if let Some(m) = matches.subcommand_matches("route") {
        let algorithm = cli_args::algorithm_from_flags(m)?;
        let args = cli_args::route_args(m)?;
        let g = read_network(&args.net)?;
        args.demand.check_vertices(&g)?;
        let adaptive = AdaptiveUnits::new(cli_args::reach(m));
        let start = cli_args::start_cu(m);
        log::info!("Loaded network with {} vertices", g.node_count());
        match routing::search(&g, &args.demand, start, adaptive, algorithm).pair {
            Some(pair) => {
                println!("cost {}", pair.first.cost + pair.second.cost);
                for (label, path) in [("first", &pair.first), ("second", &pair.second)] {
                    let edge_ids: Vec<String> = path
                        .edges
                        .iter()
                        .map(|e| e.id.to_string())
                        .collect();
                    println!(
                        "{} cost={} cu=[{},{}) edges={}",
                        label,
                        path.cost,
                        path.cu.min(),
                        path.cu.max(),
                        edge_ids.join(",")
                    );
                }
            }
            None => println!("no edge-disjoint path pair exists"),
        }
    } else if let Some(m) = matches.subcommand_matches("simulate") {
        let algorithm = cli_args::algorithm_from_flags(m)?;
        let args = cli_args::simulate_args(m);
        let mut g = read_network(&args.net)?;
        let adaptive = AdaptiveUnits::new(cli_args::reach(m));
        let start = cli_args::start_cu(m);
        log::info!("Loaded network with {} vertices", g.node_count());
        let mean_hops = mean_hop_count(&g);
        let mcat = calc_mcat(args.offered_load, args.mean_holding_time, args.mean_units, mean_hops);
        let traffic = Traffic::new(mcat, args.mean_holding_time, args.mean_units);
        log::info!("Simulating {} clients", args.population);
        let stats = sim::run(&mut g, args.population, &traffic, algorithm, start, adaptive, args.seed);
        stats.report(&g);
    } else {
        eprintln!("no subcommand given, try `route` or `simulate` - see --help");
    }
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"));
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
