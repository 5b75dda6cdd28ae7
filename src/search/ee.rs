//! Edge exclusion: two independent single-path searches instead of one
//! paired search. The first finds the cheapest feasible path; the second
//! runs over the graph with that path's edges removed. Simpler and faster
//! than Generic Dijkstra, but not provably jointly optimal, so it is never
//! cross-checked against brute force.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::rc::{Rc, Weak};

use noisy_float::prelude::N64;

use crate::graph::{Edge, Graph, Spectrum, Weighted};
use crate::label::Label;
use crate::search::{PathPairResult, PathResult};
use crate::units::{AdaptiveUnits, CU, SU};

struct Node<NId, E> {
    vertex: NId,
    label: Label,
    step: Option<E>,
    parent: Option<Rc<Node<NId, E>>>,
}

struct QueueEntry<NId, E> {
    cost: N64,
    node: Weak<Node<NId, E>>,
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

fn single_path_search<NId, N, E, X>(
    g: &Graph<NId, N, E>,
    src: NId,
    dst: NId,
    ncu: u32,
    start_cu: CU,
    adaptive: &AdaptiveUnits,
    excluded: &X,
) -> Option<(Vec<E>, Label)>
where
    NId: Copy + Eq + Hash,
    E: Edge<NId> + Weighted + Spectrum + Clone + Eq + Hash,
    X: HashSetLike<E>,
{
    let root = Rc::new(Node {
        vertex: src,
        label: Label::new(noisy_float::prelude::n64(0.0), start_cu),
        step: None,
        parent: None,
    });

    let mut permanent: HashMap<NId, Vec<Label>> = HashMap::new();
    let mut tentative: HashMap<NId, Vec<(Label, Rc<Node<NId, E>>)>> = HashMap::new();
    let mut heap: BinaryHeap<Reverse<QueueEntry<NId, E>>> = BinaryHeap::new();

    tentative
        .entry(src)
        .or_default()
        .push((root.label, Rc::clone(&root)));
    heap.push(Reverse(QueueEntry {
        cost: noisy_float::prelude::n64(0.0),
        node: Rc::downgrade(&root),
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let node = match entry.node.upgrade() {
            Some(n) => n,
            None => continue,
        };
        let v = node.vertex;
        let label = node.label;

        let still_tentative = tentative
            .get(&v)
            .map(|bucket| bucket.iter().any(|(l, _)| *l == label))
            .unwrap_or(false);
        if !still_tentative {
            continue;
        }
        if permanent
            .get(&v)
            .map(|bucket| bucket.iter().any(|l| l.dominates(&label)))
            .unwrap_or(false)
        {
            continue;
        }
        if let Some(bucket) = tentative.get_mut(&v) {
            bucket.retain(|(l, _)| *l != label);
        }
        permanent.entry(v).or_default().push(label);

        if v == dst {
            let mut edges = Vec::new();
            let mut cur = node;
            while let Some(e) = cur.step.clone() {
                edges.push(e);
                cur = cur.parent.clone().unwrap();
            }
            edges.reverse();
            return Some((edges, label));
        }

        for e in g.get_edges(v) {
            if e.is_cyclic() || excluded.contains(e) {
                continue;
            }
            let reused = {
                let mut cur = &node;
                let mut found = false;
                loop {
                    if let Some(prev) = &cur.step {
                        if prev == e {
                            found = true;
                            break;
                        }
                    }
                    match &cur.parent {
                        Some(p) => cur = p,
                        None => break,
                    }
                }
                found
            };
            if reused {
                continue;
            }
            let nv = e.other(v);
            let nc = label.cost + e.weight();
            let units = match adaptive.units(ncu, nc) {
                Some(u) => u,
                None => continue,
            };
            let mut n_su: SU = SU::from(label.cu).intersect_su(e.su());
            n_su.remove_narrower_than(units);
            for piece in n_su.iter() {
                let new_label = Label::new(nc, *piece);
                if permanent
                    .get(&nv)
                    .map(|bucket| bucket.iter().any(|l| l.dominates(&new_label)))
                    .unwrap_or(false)
                {
                    continue;
                }
                let bucket = tentative.entry(nv).or_default();
                if bucket.iter().any(|(l, _)| l.dominates(&new_label)) {
                    continue;
                }
                bucket.retain(|(l, _)| !new_label.dominates(l));
                let child = Rc::new(Node {
                    vertex: nv,
                    label: new_label,
                    step: Some(e.clone()),
                    parent: Some(Rc::clone(&node)),
                });
                heap.push(Reverse(QueueEntry {
                    cost: new_label.cost,
                    node: Rc::downgrade(&child),
                }));
                bucket.push((new_label, child));
            }
        }
    }
    None
}

/// A thin abstraction over "is this edge excluded", so the first search
/// (nothing excluded) and the second (path 1's edges excluded) share code.
pub trait HashSetLike<E> {
    fn contains(&self, e: &E) -> bool;
}
impl<E> HashSetLike<E> for () {
    fn contains(&self, _e: &E) -> bool {
        false
    }
}
impl<E: PartialEq> HashSetLike<E> for Vec<E> {
    fn contains(&self, e: &E) -> bool {
        self.iter().any(|x| x == e)
    }
}

pub fn search<NId, N, E>(
    g: &Graph<NId, N, E>,
    src: NId,
    dst: NId,
    ncu: u32,
    start_cu: CU,
    adaptive: AdaptiveUnits,
) -> Option<PathPairResult<E>>
where
    NId: Copy + Eq + Hash,
    E: Edge<NId> + Weighted + Spectrum + Clone + Eq + Hash,
{
    assert!(src != dst, "source and destination must differ");

    let (edges1, label1) = single_path_search(g, src, dst, ncu, start_cu, &adaptive, &())?;
    let (edges2, label2) =
        single_path_search(g, src, dst, ncu, start_cu, &adaptive, &edges1)?;

    assert!(
        label1.cost <= label2.cost,
        "excluding edges from a shortest path cannot make a shorter one available"
    );

    let units1 = adaptive.units(ncu, label1.cost).expect("feasible by construction");
    let units2 = adaptive.units(ncu, label2.cost).expect("feasible by construction");
    Some(PathPairResult {
        first: PathResult {
            edges: edges1,
            cu: CU::new(label1.cu.min(), label1.cu.min() + units1),
            cost: label1.cost,
        },
        second: PathResult {
            edges: edges2,
            cu: CU::new(label2.cu.min(), label2.cu.min() + units2),
            cost: label2.cost,
        },
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::RoutingEdge;
    use noisy_float::prelude::n64;

    fn edge(id: u32, p1: usize, p2: usize, w: f64) -> RoutingEdge {
        RoutingEdge {
            id,
            p1,
            p2,
            weight: n64(w),
            su: SU::from(CU::new(0, 4)),
        }
    }

    #[test]
    fn second_path_never_cheaper_than_first() {
        let mut g: Graph<usize, (), RoutingEdge> = Graph::new();
        for v in 0..3 {
            g.add_node(v, ());
        }
        g.add_edge(edge(0, 0, 1, 1.0));
        g.add_edge(edge(1, 1, 2, 1.0));
        g.add_edge(edge(2, 0, 2, 5.0));
        g.add_edge(edge(3, 1, 2, 1.0));

        let adaptive = AdaptiveUnits::new(n64(8.0));
        let result = search(&g, 0usize, 2usize, 1, CU::new(0, 4), adaptive).unwrap();
        assert!(result.first.cost <= result.second.cost);
    }

    #[test]
    fn no_alternative_edge_disjoint_path_returns_none() {
        let mut g: Graph<usize, (), RoutingEdge> = Graph::new();
        for v in 0..2 {
            g.add_node(v, ());
        }
        g.add_edge(edge(0, 0, 1, 1.0));
        let adaptive = AdaptiveUnits::new(n64(8.0));
        assert!(search(&g, 0usize, 1usize, 1, CU::new(0, 4), adaptive).is_none());
    }
}
