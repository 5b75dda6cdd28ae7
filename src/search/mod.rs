//! Shared search machinery: the relax step common to Generic Dijkstra and
//! brute force, and the result type both (and edge exclusion) return.

pub mod bf;
pub mod ee;
pub mod gd;
pub mod tracer;

use std::hash::Hash;
use std::rc::Rc;

use crate::graph::{Edge, Graph, Spectrum, Weighted};
use crate::label::{Label, LabelPair, VertexPair};
use crate::tree::{Side, TreeNode};
use crate::units::{AdaptiveUnits, SU};

/// One fully-reconstructed path: the edges it follows and the spectrum
/// allocated to it (a single contiguous window of the requested width).
#[derive(Clone, Debug)]
pub struct PathResult<E> {
    pub edges: Vec<E>,
    pub cu: crate::units::CU,
    pub cost: noisy_float::prelude::N64,
}

/// The two edge-disjoint paths a search produced.
#[derive(Clone, Debug)]
pub struct PathPairResult<E> {
    pub first: PathResult<E>,
    pub second: PathResult<E>,
}

/// All children reachable from `node` by extending exactly one of its two
/// paths by one edge: for each incident edge not already used by either
/// path, and each spectrum window wide enough to carry the demand at the
/// resulting cost, a new tree node.
///
/// This is the one piece of relax logic Generic Dijkstra and brute force
/// share; they differ only in what they do with the candidates (dominance
/// pruning vs. none).
pub fn relax_node<NId, N, E>(
    g: &Graph<NId, N, E>,
    node: &Rc<TreeNode<NId, E>>,
    adaptive: &AdaptiveUnits,
    ncu: u32,
) -> Vec<Rc<TreeNode<NId, E>>>
where
    NId: Copy + Eq + Hash + Ord,
    E: Edge<NId> + Weighted + Spectrum + Clone + Eq + Hash,
{
    let mut out = Vec::new();
    let vp = node.vertices;
    let LabelPair(l1, l2) = node.labels;
    extend_slot(g, node, vp.v1, l1, l2, Side::First, adaptive, ncu, &mut out);
    extend_slot(g, node, vp.v2, l2, l1, Side::Second, adaptive, ncu, &mut out);
    out
}

#[allow(clippy::too_many_arguments)]
fn extend_slot<NId, N, E>(
    g: &Graph<NId, N, E>,
    node: &Rc<TreeNode<NId, E>>,
    moving_vertex: NId,
    moving_label: Label,
    fixed_label: Label,
    slot: Side,
    adaptive: &AdaptiveUnits,
    ncu: u32,
    out: &mut Vec<Rc<TreeNode<NId, E>>>,
) where
    NId: Copy + Eq + Hash + Ord,
    E: Edge<NId> + Weighted + Spectrum + Clone + Eq + Hash,
{
    let fixed_vertex = if slot == Side::First {
        node.vertices.v2
    } else {
        node.vertices.v1
    };
    for e in g.get_edges(moving_vertex) {
        if e.is_cyclic() {
            continue;
        }
        if node.uses_edge(|used| used == e) {
            continue;
        }
        let new_vertex = e.other(moving_vertex);
        let nc = moving_label.cost + e.weight();
        let units = match adaptive.units(ncu, nc) {
            Some(u) => u,
            None => continue,
        };
        let mut n_su: SU = SU::from(moving_label.cu).intersect_su(e.su());
        n_su.remove_narrower_than(units);
        for piece in n_su.iter() {
            let new_label = Label::new(nc, *piece);
            let (tv1, tv2, tl1, tl2) = if slot == Side::First {
                (new_vertex, fixed_vertex, new_label, fixed_label)
            } else {
                (fixed_vertex, new_vertex, fixed_label, new_label)
            };
            let (child_vp, child_labels) = VertexPair::with_labels(tv1, tv2, tl1, tl2);
            out.push(TreeNode::child(node, child_vp, child_labels, e.clone(), slot));
        }
    }
}
