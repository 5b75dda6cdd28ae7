//! Boundary error types. Internal invariant violations use `assert!`/
//! `panic!` instead - see the search modules - because they can never fire
//! on valid input and aren't part of this crate's contract with callers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("malformed DOT source: {0}")]
    Parse(String),
    #[error("vertex id {0:?} is not a valid identifier")]
    BadVertexId(String),
    #[error("edge references vertex not declared in the graph: {0}-{1}")]
    DanglingEdge(usize, usize),
    #[error("missing required edge attribute: {0}")]
    MissingAttribute(String),
    #[error("edge {0}-{1} has a non-positive or unparsable weight")]
    BadWeight(usize, usize),
    #[error("unparsable spectrum attribute: {0:?}")]
    BadSpectrum(String),
}

#[derive(Error, Debug)]
pub enum DemandError {
    #[error("source and destination must differ, both were {0}")]
    SameEndpoint(usize),
    #[error("requested units must be positive")]
    NonPositiveUnits,
    #[error("source vertex {0} not present in the graph")]
    UnknownSource(usize),
    #[error("destination vertex {0} not present in the graph")]
    UnknownDestination(usize),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Demand(#[from] DemandError),
    #[error("could not read network file {path:?}: {source}")]
    ReadNetwork {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no search algorithm requested: pass --gd and/or --ee")]
    NoAlgorithmRequested,
    #[error("--bf requires --gd")]
    BruteForceNeedsGenericDijkstra,
}
