//! Command line surface: `route` for a single demand, `simulate` for a
//! population of clients arriving over time. Built with the same `clap`
//! builder style the original CLI uses.

use clap::{App, Arg, ArgMatches, SubCommand};
use noisy_float::prelude::n64;

use crate::error::CliError;
use crate::routing::{Algorithm, Demand};
use crate::units::CU;

pub fn app() -> App<'static, 'static> {
    App::new("ddpp")
        .version(clap::crate_version!())
        .about("Edge-disjoint, spectrum-constrained protected path pairs over a generic graph")
        .subcommand(
            SubCommand::with_name("route")
                .about("Compute one demand's disjoint path pair")
                .arg(Arg::with_name("net").long("net").takes_value(true).required(true).help("Graphviz DOT network file"))
                .arg(Arg::with_name("units").long("units").takes_value(true).required(true).help("Total spectrum units per edge"))
                .arg(Arg::with_name("reach").long("reach").takes_value(true).required(true).help("Maximum reach of the highest modulation level"))
                .arg(Arg::with_name("src").long("src").takes_value(true).required(true).help("Source vertex"))
                .arg(Arg::with_name("dst").long("dst").takes_value(true).required(true).help("Destination vertex"))
                .arg(Arg::with_name("ncu").long("ncu").takes_value(true).required(true).help("Requested line-rate units"))
                .arg(Arg::with_name("gd").long("gd").help("Run Generic Dijkstra"))
                .arg(Arg::with_name("bf").long("bf").help("Cross-check against brute force (requires --gd)"))
                .arg(Arg::with_name("ee").long("ee").help("Run edge exclusion")),
        )
        .subcommand(
            SubCommand::with_name("simulate")
                .about("Run a population of clients through the network")
                .arg(Arg::with_name("net").long("net").takes_value(true).required(true).help("Graphviz DOT network file"))
                .arg(Arg::with_name("units").long("units").takes_value(true).required(true).help("Total spectrum units per edge"))
                .arg(Arg::with_name("reach").long("reach").takes_value(true).required(true).help("Maximum reach of the highest modulation level"))
                .arg(Arg::with_name("ol").long("ol").takes_value(true).required(true).help("Offered load, in Erlangs"))
                .arg(Arg::with_name("mht").long("mht").takes_value(true).required(true).help("Mean holding time"))
                .arg(Arg::with_name("mnu").long("mnu").takes_value(true).required(true).help("Mean requested units"))
                .arg(Arg::with_name("population").long("population").takes_value(true).required(true).help("Number of clients to simulate"))
                .arg(Arg::with_name("seed").long("seed").takes_value(true).default_value("0").help("RNG seed"))
                .arg(Arg::with_name("gd").long("gd").help("Run Generic Dijkstra"))
                .arg(Arg::with_name("bf").long("bf").help("Cross-check against brute force (requires --gd)"))
                .arg(Arg::with_name("ee").long("ee").help("Run edge exclusion")),
        )
}

fn parse<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    matches
        .value_of(name)
        .unwrap()
        .parse()
        .unwrap_or_else(|e| panic!("--{} is not valid: {:?}", name, e))
}

/// Picks the requested algorithm from `--gd`/`--bf`/`--ee`, matching the
/// original CLI's "at least one variant, `--bf` only alongside `--gd`" rule.
pub fn algorithm_from_flags(matches: &ArgMatches) -> Result<Algorithm, CliError> {
    let gd = matches.is_present("gd");
    let bf = matches.is_present("bf");
    let ee = matches.is_present("ee");
    if bf && !gd {
        return Err(CliError::BruteForceNeedsGenericDijkstra);
    }
    if ee {
        Ok(Algorithm::EdgeExclusion)
    } else if gd && bf {
        Ok(Algorithm::GenericDijkstraCrossChecked)
    } else if gd {
        Ok(Algorithm::GenericDijkstra)
    } else {
        Err(CliError::NoAlgorithmRequested)
    }
}

pub fn start_cu(matches: &ArgMatches) -> CU {
    let units: u32 = parse(matches, "units");
    CU::new(0, units)
}

pub fn reach(matches: &ArgMatches) -> noisy_float::prelude::N64 {
    n64(parse::<f64>(matches, "reach"))
}

pub struct RouteArgs {
    pub net: String,
    pub demand: Demand,
}

pub fn route_args(matches: &ArgMatches) -> Result<RouteArgs, CliError> {
    let net = matches.value_of("net").unwrap().to_string();
    let src: usize = parse(matches, "src");
    let dst: usize = parse(matches, "dst");
    let ncu: u32 = parse(matches, "ncu");
    let demand = Demand::new(src, dst, ncu)?;
    Ok(RouteArgs { net, demand })
}

pub struct SimulateArgs {
    pub net: String,
    pub offered_load: f64,
    pub mean_holding_time: f64,
    pub mean_units: f64,
    pub population: u64,
    pub seed: u64,
}

pub fn simulate_args(matches: &ArgMatches) -> SimulateArgs {
    SimulateArgs {
        net: matches.value_of("net").unwrap().to_string(),
        offered_load: parse(matches, "ol"),
        mean_holding_time: parse(matches, "mht"),
        mean_units: parse(matches, "mnu"),
        population: parse(matches, "population"),
        seed: parse(matches, "seed"),
    }
}
