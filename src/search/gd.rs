//! Generic Dijkstra: best-first search over joint-state pairs, pruned by
//! Pareto dominance against both the permanent (`S`) and tentative (`T`)
//! label sets, with a priority queue holding only weak references so
//! dominated tentative entries are reclaimed lazily rather than swept.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::rc::{Rc, Weak};

use log::{debug, trace};
use noisy_float::prelude::N64;

use crate::graph::{Edge, Graph, Spectrum, Weighted};
use crate::label::{Label, LabelPair, VertexPair};
use crate::search::relax_node;
use crate::tree::TreeNode;
use crate::units::{AdaptiveUnits, CU};

struct QueueEntry<NId, E> {
    cost: N64,
    node: Weak<TreeNode<NId, E>>,
}

impl<NId, E> PartialEq for QueueEntry<NId, E> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl<NId, E> Eq for QueueEntry<NId, E> {}
impl<NId, E> PartialOrd for QueueEntry<NId, E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<NId, E> Ord for QueueEntry<NId, E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost.cmp(&other.cost)
    }
}

/// Performance counters in the spirit of the original's memory-word
/// accounting: queue/tentative/permanent sizes observed during the run,
/// reported by `stats` per algorithm.
#[derive(Clone, Copy, Default, Debug)]
pub struct SearchStats {
    pub max_pq_size: usize,
    pub max_tentative_size: usize,
    pub max_permanent_size: usize,
    pub pops: usize,
}

pub struct Outcome<NId, E> {
    pub cost: N64,
    pub terminal: Rc<TreeNode<NId, E>>,
    pub stats: SearchStats,
}

fn dominated_by_any<NId: Eq + Hash, E>(
    set: &HashMap<VertexPair<NId>, Vec<LabelPair>>,
    vp: &VertexPair<NId>,
    labels: &LabelPair,
) -> bool {
    set.get(vp)
        .map(|v| v.iter().any(|l| l.dominates(labels)))
        .unwrap_or(false)
}

/// Searches `g` for the jointly-cheapest pair of edge-disjoint paths from
/// `src` to `dst` each able to carry `ncu` units out of `start_cu`.
///
/// Panics (via `assert!`) if `src == dst` - that is an internal precondition
/// violation, not a user input error; callers go through `Demand::new` to
/// reject that case with a proper error first.
pub fn search<NId, N, E>(
    g: &Graph<NId, N, E>,
    src: NId,
    dst: NId,
    ncu: u32,
    start_cu: CU,
    adaptive: AdaptiveUnits,
) -> Option<Outcome<NId, E>>
where
    NId: Copy + Eq + Hash + Ord + std::fmt::Debug,
    E: Edge<NId> + Weighted + Spectrum + Clone + Eq + Hash,
{
    assert!(src != dst, "source and destination must differ");

    let root_vp = VertexPair::new(src, src);
    let root_label = Label::new(noisy_float::prelude::n64(0.0), start_cu);
    let root_labels = LabelPair::new(root_label, root_label);
    let root = TreeNode::root(root_vp, root_labels);

    let mut permanent: HashMap<VertexPair<NId>, Vec<LabelPair>> = HashMap::new();
    let mut tentative: HashMap<VertexPair<NId>, Vec<(LabelPair, Rc<TreeNode<NId, E>>)>> =
        HashMap::new();
    let mut heap: BinaryHeap<Reverse<QueueEntry<NId, E>>> = BinaryHeap::new();
    let mut stats = SearchStats::default();

    tentative
        .entry(root_vp)
        .or_default()
        .push((root_labels, Rc::clone(&root)));
    heap.push(Reverse(QueueEntry {
        cost: noisy_float::prelude::n64(0.0),
        node: Rc::downgrade(&root),
    }));

    let goal = VertexPair::new(dst, dst);

    while let Some(Reverse(entry)) = heap.pop() {
        stats.pops += 1;
        stats.max_pq_size = stats.max_pq_size.max(heap.len() + 1);
        let node = match entry.node.upgrade() {
            Some(n) => n,
            None => continue,
        };
        let vp = node.vertices;
        let labels = node.labels;

        let still_tentative = tentative
            .get(&vp)
            .map(|v| v.iter().any(|(l, _)| *l == labels))
            .unwrap_or(false);
        if !still_tentative {
            trace!("skip stale tentative entry at {:?}", vp);
            continue;
        }
        if dominated_by_any(&permanent, &vp, &labels) {
            continue;
        }

        if let Some(bucket) = tentative.get_mut(&vp) {
            bucket.retain(|(l, _)| *l != labels);
        }
        permanent.entry(vp).or_default().push(labels);
        stats.max_permanent_size = stats.max_permanent_size.max(permanent.len());

        if vp == goal {
            let cost = labels.joint_cost(ncu, &adaptive);
            debug!("generic dijkstra reached goal at joint cost {}", cost);
            return Some(Outcome {
                cost,
                terminal: node,
                stats,
            });
        }

        for child in relax_node(g, &node, &adaptive, ncu) {
            let cvp = child.vertices;
            let clabels = child.labels;
            if dominated_by_any(&permanent, &cvp, &clabels) {
                continue;
            }
            let bucket = tentative.entry(cvp).or_default();
            if bucket.iter().any(|(l, _)| l.dominates(&clabels)) {
                continue;
            }
            bucket.retain(|(l, _)| !clabels.dominates(l));
            heap.push(Reverse(QueueEntry {
                cost: clabels.joint_cost(ncu, &adaptive),
                node: Rc::downgrade(&child),
            }));
            bucket.push((clabels, child));
            stats.max_tentative_size = stats.max_tentative_size.max(bucket.len());
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{Graph, RoutingEdge};
    use crate::units::SU;
    use noisy_float::prelude::n64;

    fn edge(id: u32, p1: usize, p2: usize, w: f64, su: &[(u32, u32)]) -> RoutingEdge {
        let mut s = SU::new();
        for (a, b) in su {
            s.insert(CU::new(*a, *b));
        }
        RoutingEdge {
            id,
            p1,
            p2,
            weight: n64(w),
            su: s,
        }
    }

    /// Two parallel edges 0-1 and two parallel edges 1-2, weights 1,2,1,1,
    /// all with full [0,4) spectrum. Demand ncu=1 from 0 to 2 at reach 8.
    /// Ported from the retained test oracle (`ideas_1`): cheapest
    /// edge-disjoint pair is ([w1,w1]=2, [w1,w2]=3) with first-fit windows
    /// [0,2) and [1,4).
    #[test]
    fn scenario_parallel_edges_matches_reference() {
        let mut g: Graph<usize, (), RoutingEdge> = Graph::new();
        for v in 0..3 {
            g.add_node(v, ());
        }
        g.add_edge(edge(0, 0, 1, 1.0, &[(0, 2)]));
        g.add_edge(edge(1, 0, 1, 2.0, &[(1, 4)]));
        g.add_edge(edge(2, 1, 2, 1.0, &[(0, 4)]));
        g.add_edge(edge(3, 1, 2, 1.0, &[(0, 4)]));

        let adaptive = AdaptiveUnits::new(n64(8.0));
        let outcome = search(&g, 0usize, 2usize, 1, CU::new(0, 4), adaptive).unwrap();
        // Raw path costs are 2 and 3; the queue key is spectrum cost
        // (cost * units(ncu, cost)), so 2*units(1,2) + 3*units(1,3) = 2*2 + 3*3 = 13,
        // not the raw sum 5 - see label.rs's joint_cost.
        assert_eq!(outcome.cost, n64(13.0));
    }

    #[test]
    fn unreachable_destination_returns_none() {
        let mut g: Graph<usize, (), RoutingEdge> = Graph::new();
        g.add_node(0, ());
        g.add_node(1, ());
        let adaptive = AdaptiveUnits::new(n64(8.0));
        assert!(search(&g, 0usize, 1usize, 1, CU::new(0, 4), adaptive).is_none());
    }

    #[test]
    fn no_second_disjoint_path_returns_none() {
        let mut g: Graph<usize, (), RoutingEdge> = Graph::new();
        for v in 0..2 {
            g.add_node(v, ());
        }
        g.add_edge(edge(0, 0, 1, 1.0, &[(0, 4)]));
        let adaptive = AdaptiveUnits::new(n64(8.0));
        assert!(search(&g, 0usize, 1usize, 1, CU::new(0, 4), adaptive).is_none());
    }

    /// Diamond: e1(0-1)=3, e2(1-3)=1, e3(1-2)=1, e4(0-2)=1, e5(2-3)=4, all
    /// spectra [0,4). The only edge-disjoint pair spanning 0->3 is
    /// [e1,e2] (cost 4) and [e4,e5] (cost 5) - any pair using the cheaper
    /// 3-edge route [e4,e3,e2] leaves no disjoint second route to 3.
    #[test]
    fn scenario_diamond_matches_reference() {
        let mut g: Graph<usize, (), RoutingEdge> = Graph::new();
        for v in 0..4 {
            g.add_node(v, ());
        }
        g.add_edge(edge(0, 0, 1, 3.0, &[(0, 4)]));
        g.add_edge(edge(1, 1, 3, 1.0, &[(0, 4)]));
        g.add_edge(edge(2, 1, 2, 1.0, &[(0, 4)]));
        g.add_edge(edge(3, 0, 2, 1.0, &[(0, 4)]));
        g.add_edge(edge(4, 2, 3, 4.0, &[(0, 4)]));

        let adaptive = AdaptiveUnits::new(n64(8.0));
        let outcome = search(&g, 0usize, 3usize, 1, CU::new(0, 4), adaptive).unwrap();
        // units(1,4)=3, units(1,5)=4 (see units.rs's reference table):
        // 4*3 + 5*4 = 32.
        assert_eq!(outcome.cost, n64(32.0));
    }

    /// The diamond above plus a parallel 0-1 edge (e1a, weight 5) and a
    /// parallel 1-3 edge (e2a, weight 1, spectrum narrowed to [1,4)), with
    /// e1's weight raised to 4 and e5's to 5. The cheapest disjoint pair is
    /// now [e4,e3,e2a] (cost 3, narrowed by e2a to CU [1,4)) paired with
    /// [e1,e2] (cost 5, full CU [0,4)).
    #[test]
    fn scenario_diamond_with_parallel_edges_matches_reference() {
        let mut g: Graph<usize, (), RoutingEdge> = Graph::new();
        for v in 0..4 {
            g.add_node(v, ());
        }
        g.add_edge(edge(0, 0, 1, 4.0, &[(0, 4)])); // e1
        g.add_edge(edge(1, 0, 1, 5.0, &[(0, 4)])); // e1a
        g.add_edge(edge(2, 1, 3, 1.0, &[(0, 4)])); // e2
        g.add_edge(edge(3, 1, 3, 1.0, &[(1, 4)])); // e2a
        g.add_edge(edge(4, 1, 2, 1.0, &[(0, 4)])); // e3
        g.add_edge(edge(5, 0, 2, 1.0, &[(0, 4)])); // e4
        g.add_edge(edge(6, 2, 3, 5.0, &[(0, 4)])); // e5

        let adaptive = AdaptiveUnits::new(n64(8.0));
        let outcome = search(&g, 0usize, 3usize, 1, CU::new(0, 4), adaptive).unwrap();
        // units(1,3)=3, units(1,5)=4: 3*3 + 5*4 = 29.
        assert_eq!(outcome.cost, n64(29.0));

        let pair = crate::search::tracer::trace(&outcome.terminal, 1, &adaptive);
        assert_eq!(pair.first.cost, n64(3.0));
        assert_eq!(pair.first.cu, CU::new(1, 4));
        let mut first_ids: Vec<u32> = pair.first.edges.iter().map(|e| e.id).collect();
        first_ids.sort_unstable();
        assert_eq!(first_ids, vec![3, 4, 5]);

        assert_eq!(pair.second.cost, n64(5.0));
        assert_eq!(pair.second.cu, CU::new(0, 4));
        let mut second_ids: Vec<u32> = pair.second.edges.iter().map(|e| e.id).collect();
        second_ids.sort_unstable();
        assert_eq!(second_ids, vec![0, 2]);
    }
}
