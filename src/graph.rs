//! Generic graph container and the concrete edge type routing runs over,
//! plus Graphviz DOT persistence.

use std::collections::HashSet;
use std::hash::Hash;

use dot_parser::canonical::Graph as DotGraph;
use indexmap::IndexMap;
use noisy_float::prelude::{n64, N64};

use crate::error::GraphError;
use crate::units::{CU, SU};

/// An edge connecting two vertices of type `NId`. Parallel edges between the
/// same pair of vertices are distinct values of `E`, so `E` carries its own
/// identity rather than being identified by its endpoints.
pub trait Edge<NId: Copy + Eq + Hash> {
    fn p1(&self) -> NId;
    fn p2(&self) -> NId;

    fn is_cyclic(&self) -> bool {
        self.p1() == self.p2()
    }

    /// The vertex at the other end from `from`. Panics if `from` is not one
    /// of this edge's endpoints.
    fn other(&self, from: NId) -> NId {
        if self.p1() == from {
            self.p2()
        } else if self.p2() == from {
            self.p1()
        } else {
            panic!("vertex is not an endpoint of this edge");
        }
    }
}

/// An edge that carries a routing cost.
pub trait Weighted {
    fn weight(&self) -> N64;
}

/// An edge that carries spectrum availability.
pub trait Spectrum {
    fn su(&self) -> &SU;
}

/// The concrete edge type the routing CLI operates on: two endpoints, a
/// weight, the available spectrum, and a numeric id distinguishing parallel
/// edges.
#[derive(Clone, Debug)]
pub struct RoutingEdge {
    pub id: u32,
    pub p1: usize,
    pub p2: usize,
    pub weight: N64,
    pub su: SU,
}

impl PartialEq for RoutingEdge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for RoutingEdge {}
impl Hash for RoutingEdge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Edge<usize> for RoutingEdge {
    fn p1(&self) -> usize {
        self.p1
    }
    fn p2(&self) -> usize {
        self.p2
    }
}

impl Weighted for RoutingEdge {
    fn weight(&self) -> N64 {
        self.weight
    }
}

impl Spectrum for RoutingEdge {
    fn su(&self) -> &SU {
        &self.su
    }
}

/// An undirected multigraph keyed by vertex id, adjacency stored per-vertex
/// the way the original solver stores it: an `IndexMap` of `HashSet`s, so
/// insertion order of vertices is preserved for deterministic iteration.
#[derive(Clone, Debug, Default)]
pub struct Graph<NId: Copy + Eq + Hash, N, E> {
    nodes: IndexMap<NId, N>,
    edges: IndexMap<NId, HashSet<E>>,
    _empty: HashSet<E>,
}

impl<NId: Copy + Eq + Hash, N, E: Edge<NId> + Clone + Eq + Hash> Graph<NId, N, E> {
    pub fn new() -> Self {
        Graph {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            _empty: HashSet::new(),
        }
    }

    pub fn add_node(&mut self, id: NId, data: N) {
        self.nodes.insert(id, data);
        self.edges.entry(id).or_insert_with(HashSet::new);
    }

    pub fn has_node(&self, id: NId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get_node(&self, id: NId) -> Option<&N> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Adds an edge, registering it against both endpoints.
    pub fn add_edge(&mut self, e: E) {
        self.edges
            .entry(e.p1())
            .or_insert_with(HashSet::new)
            .insert(e.clone());
        if e.p1() != e.p2() {
            self.edges.entry(e.p2()).or_insert_with(HashSet::new).insert(e);
        }
    }

    pub fn get_edges(&self, v: NId) -> &HashSet<E> {
        self.edges.get(&v).unwrap_or(&self._empty)
    }

    pub fn edges(&self) -> impl Iterator<Item = &E> {
        let mut seen = HashSet::new();
        self.edges
            .values()
            .flatten()
            .filter(move |e| seen.insert(*e))
    }

    pub fn is_orphan(&self, v: NId) -> bool {
        self.get_edges(v).is_empty()
    }

    /// Applies `update` to the edge matching `matches` at vertex `v1`,
    /// keeping its (possibly separate) copy at `v2`'s adjacency set in
    /// sync. Used to reserve and release spectrum as connections are
    /// established and torn down.
    pub fn update_edge<F, U>(&mut self, v1: NId, v2: NId, matches: F, mut update: U)
    where
        F: Fn(&E) -> bool,
        U: FnMut(&mut E),
    {
        let updated = match self.edges.get(&v1).and_then(|set| set.iter().find(|e| matches(e))) {
            Some(e) => {
                let mut e = e.clone();
                update(&mut e);
                e
            }
            None => return,
        };
        if let Some(set) = self.edges.get_mut(&v1) {
            set.replace(updated.clone());
        }
        if v2 != v1 {
            if let Some(set) = self.edges.get_mut(&v2) {
                set.replace(updated);
            }
        }
    }

    /// Builds the sub-graph of `self` with `excluded` edges removed from
    /// every adjacency set. Used by the edge-exclusion search variant.
    pub fn without_edges<F: Fn(&E) -> bool>(&self, excluded: F) -> Graph<NId, N, E>
    where
        N: Clone,
    {
        let mut g = Graph::new();
        for (id, data) in self.nodes.iter() {
            g.add_node(*id, data.clone());
        }
        for set in self.edges.values() {
            for e in set {
                if !excluded(e) {
                    g.add_edge(e.clone());
                }
            }
        }
        g
    }
}

/// Parses a Graphviz DOT file into a routing graph over `usize` vertex ids.
///
/// Node names are parsed as `usize`; edge attributes are `weight` (a
/// positive float) and `su` (semicolon-separated `min-max` intervals, e.g.
/// `0-4;6-10`).
pub fn load_dot(src: &str) -> Result<Graph<usize, (), RoutingEdge>, GraphError> {
    let ast = dot_parser::ast::Graph::try_from(src)
        .map_err(|e| GraphError::Parse(e.to_string()))?;
    let canon = DotGraph::from(ast);

    let mut g = Graph::new();
    for (name, node) in canon.nodes.set.iter() {
        let id: usize = name
            .parse()
            .map_err(|_| GraphError::BadVertexId(name.clone()))?;
        let _ = node;
        g.add_node(id, ());
    }

    let mut next_id = 0u32;
    for edge in canon.edges.set.iter() {
        let p1: usize = edge
            .from
            .parse()
            .map_err(|_| GraphError::BadVertexId(edge.from.clone()))?;
        let p2: usize = edge
            .to
            .parse()
            .map_err(|_| GraphError::BadVertexId(edge.to.clone()))?;
        if !g.has_node(p1) || !g.has_node(p2) {
            return Err(GraphError::DanglingEdge(p1, p2));
        }
        let weight = edge
            .attr
            .elems
            .iter()
            .find(|(k, _)| k.as_str() == "weight")
            .ok_or_else(|| GraphError::MissingAttribute("weight".into()))?
            .1
            .trim_matches('"')
            .parse::<f64>()
            .map_err(|_| GraphError::BadWeight(p1, p2))?;
        if weight <= 0.0 {
            return Err(GraphError::BadWeight(p1, p2));
        }
        let su_attr = edge
            .attr
            .elems
            .iter()
            .find(|(k, _)| k.as_str() == "su")
            .map(|(_, v)| v.trim_matches('"'))
            .unwrap_or("");
        let su = parse_su(su_attr)?;
        g.add_edge(RoutingEdge {
            id: next_id,
            p1,
            p2,
            weight: n64(weight),
            su,
        });
        next_id += 1;
    }
    Ok(g)
}

/// Parses `"0-4;6-10"` into an `SU`. An empty string yields an empty `SU`.
fn parse_su(attr: &str) -> Result<SU, GraphError> {
    let mut su = SU::new();
    if attr.is_empty() {
        return Ok(su);
    }
    for part in attr.split(';') {
        let (lo, hi) = part
            .split_once('-')
            .ok_or_else(|| GraphError::BadSpectrum(attr.to_string()))?;
        let lo: u32 = lo
            .trim()
            .parse()
            .map_err(|_| GraphError::BadSpectrum(attr.to_string()))?;
        let hi: u32 = hi
            .trim()
            .parse()
            .map_err(|_| GraphError::BadSpectrum(attr.to_string()))?;
        su.insert(CU::new(lo, hi));
    }
    Ok(su)
}
