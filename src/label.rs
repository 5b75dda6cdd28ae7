//! Labels, label pairs, and the canonical unordered vertex pair they're
//! indexed by.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use noisy_float::prelude::{n64, N64};
use serde::{Deserialize, Serialize};

use crate::units::{AdaptiveUnits, CU};

/// `(cost, CU)`: the joint cost to reach a vertex along one of the two
/// paths, and the spectrum still available for it.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize, Debug)]
pub struct Label {
    pub cost: N64,
    pub cu: CU,
}

impl Label {
    pub fn new(cost: N64, cu: CU) -> Self {
        Label { cost, cu }
    }

    /// `self` dominates `other`: no worse cost, and everything `other`
    /// could still allocate, `self` could too.
    pub fn dominates(&self, other: &Label) -> bool {
        self.cost <= other.cost && self.cu.includes(&other.cu)
    }
}

/// A label's cost times the contiguous units it needs at that cost - the
/// quantity the search actually optimizes, not the raw path cost.
fn spectrum_cost(label: &Label, ncu: u32, adaptive: &AdaptiveUnits) -> N64 {
    let units = adaptive
        .units(ncu, label.cost)
        .expect("a label present on the search tree must be feasible");
    label.cost * n64(f64::from(units))
}

/// A pair of labels, one per path, for a node of the shared search tree.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize, Debug)]
pub struct LabelPair(pub Label, pub Label);

impl LabelPair {
    pub fn new(first: Label, second: Label) -> Self {
        LabelPair(first, second)
    }

    /// The cost used to key the search: not the sum of the two raw path
    /// costs, but the sum of each path's *spectrum cost* (its length times
    /// the contiguous units it needs), matching `gd.cc`/`bf.cc`'s
    /// `c1 = l1 * units(ncu, l1); c2 = l2 * units(ncu, l2); pq.push(c1+c2)`.
    pub fn joint_cost(&self, ncu: u32, adaptive: &AdaptiveUnits) -> N64 {
        spectrum_cost(&self.0, ncu, adaptive) + spectrum_cost(&self.1, ncu, adaptive)
    }

    /// Component-wise dominance: `self` dominates `other` iff it dominates
    /// `other` on both paths.
    pub fn dominates(&self, other: &LabelPair) -> bool {
        self.0.dominates(&other.0) && self.1.dominates(&other.1)
    }
}

/// An unordered pair of vertices, canonicalised so `(a, b)` and `(b, a)`
/// hash and compare equal. `swapped` records whether the caller's order had
/// to be flipped to reach the canonical form, so a label pair stored against
/// this key can be matched back to the right path; it is metadata about how
/// the pair was reached, not part of the pair's identity, so equality and
/// hashing ignore it - two states over the same two vertices must land in
/// the same dominance bucket regardless of which side each was reached
/// from.
#[derive(Clone, Copy, Debug)]
pub struct VertexPair<NId> {
    pub v1: NId,
    pub v2: NId,
    pub swapped: bool,
}

impl<NId: PartialEq> PartialEq for VertexPair<NId> {
    fn eq(&self, other: &Self) -> bool {
        self.v1 == other.v1 && self.v2 == other.v2
    }
}
impl<NId: Eq> Eq for VertexPair<NId> {}
impl<NId: Hash> Hash for VertexPair<NId> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.v1.hash(state);
        self.v2.hash(state);
    }
}

impl<NId: Ord + Copy> VertexPair<NId> {
    pub fn new(a: NId, b: NId) -> Self {
        match a.cmp(&b) {
            Ordering::Greater => VertexPair {
                v1: b,
                v2: a,
                swapped: true,
            },
            _ => VertexPair {
                v1: a,
                v2: b,
                swapped: false,
            },
        }
    }

    /// Canonicalises `(a, b)` together with the label pair reached there,
    /// in one step: ordered by vertex id, same as [`new`](Self::new), but
    /// when `a == b` (the two paths coincidentally meet) the tie is broken
    /// by label order instead, matching `gd.cc`'s
    /// `else if (cvp.first == cvp.second && !(clp.first <= clp.second))`.
    /// Without this, states meeting at the same vertex end up with an
    /// arbitrary, non-canonical label order and dominance pruning misses
    /// them.
    pub fn with_labels(a: NId, b: NId, for_a: Label, for_b: Label) -> (Self, LabelPair) {
        match a.cmp(&b) {
            Ordering::Greater => (
                VertexPair {
                    v1: b,
                    v2: a,
                    swapped: true,
                },
                LabelPair(for_b, for_a),
            ),
            Ordering::Less => (
                VertexPair {
                    v1: a,
                    v2: b,
                    swapped: false,
                },
                LabelPair(for_a, for_b),
            ),
            Ordering::Equal if !for_a.dominates(&for_b) => (
                VertexPair {
                    v1: a,
                    v2: b,
                    swapped: true,
                },
                LabelPair(for_b, for_a),
            ),
            Ordering::Equal => (
                VertexPair {
                    v1: a,
                    v2: b,
                    swapped: false,
                },
                LabelPair(for_a, for_b),
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use noisy_float::prelude::n64;
    use quickcheck_macros::quickcheck;

    fn label(cost: f64, min: u32, max: u32) -> Label {
        Label::new(n64(cost), CU::new(min, max))
    }

    #[test]
    fn label_dominance_requires_both_conditions() {
        let cheap_narrow = label(1.0, 2, 4);
        let cheap_wide = label(1.0, 0, 10);
        let pricey_wide = label(5.0, 0, 10);
        assert!(cheap_wide.dominates(&cheap_narrow));
        assert!(!cheap_narrow.dominates(&cheap_wide));
        assert!(!pricey_wide.dominates(&cheap_narrow));
    }

    #[test]
    fn label_dominance_is_reflexive() {
        let l = label(3.0, 1, 5);
        assert!(l.dominates(&l));
    }

    #[quickcheck]
    fn label_dominance_is_transitive(c1: u8, c2: u8, c3: u8) -> bool {
        let a = label(c1 as f64, 0, 10);
        let b = label((c1 as u16 + c2 as u16) as f64, 0, 8);
        let c = label((c1 as u16 + c2 as u16 + c3 as u16) as f64, 0, 6);
        !(a.dominates(&b) && b.dominates(&c)) || a.dominates(&c)
    }

    #[test]
    fn label_pair_dominance_is_componentwise() {
        let p1 = LabelPair::new(label(1.0, 0, 4), label(2.0, 0, 4));
        let p2 = LabelPair::new(label(1.0, 1, 3), label(3.0, 0, 4));
        assert!(p1.dominates(&p2));
        assert!(!p2.dominates(&p1));
    }

    #[test]
    fn vertex_pair_canonicalises_and_tracks_swap() {
        let p = VertexPair::new(5, 2);
        assert_eq!((p.v1, p.v2, p.swapped), (2, 5, true));
        let q = VertexPair::new(2, 5);
        assert_eq!((q.v1, q.v2, q.swapped), (2, 5, false));
        assert_eq!(p, q);
    }

    #[test]
    fn vertex_pair_equality_ignores_swap_flag() {
        let reached_as_2_5 = VertexPair {
            v1: 2,
            v2: 5,
            swapped: false,
        };
        let reached_as_5_2 = VertexPair {
            v1: 2,
            v2: 5,
            swapped: true,
        };
        assert_eq!(reached_as_2_5, reached_as_5_2);
        let mut hasher_a = std::collections::hash_map::DefaultHasher::new();
        let mut hasher_b = std::collections::hash_map::DefaultHasher::new();
        reached_as_2_5.hash(&mut hasher_a);
        reached_as_5_2.hash(&mut hasher_b);
        assert_eq!(hasher_a.finish(), hasher_b.finish());
    }

    #[test]
    fn vertex_pair_with_labels_orders_by_vertex_when_distinct() {
        let la = label(1.0, 0, 4);
        let lb = label(2.0, 0, 4);
        let (vp, labels) = VertexPair::with_labels(5, 2, la, lb);
        assert_eq!((vp.v1, vp.v2, vp.swapped), (2, 5, true));
        assert_eq!((labels.0.cost, labels.1.cost), (lb.cost, la.cost));
    }

    #[test]
    fn vertex_pair_with_labels_breaks_tie_by_label_order_when_equal() {
        let dominant = label(1.0, 0, 10);
        let dominated = label(1.0, 2, 4);
        // a's label already dominates b's: no swap needed.
        let (vp, labels) = VertexPair::with_labels(5, 5, dominant, dominated);
        assert!(!vp.swapped);
        assert_eq!((labels.0.cost, labels.0.cu), (dominant.cost, dominant.cu));

        // a's label does not dominate b's: swap so the dominant label leads.
        let (vp, labels) = VertexPair::with_labels(5, 5, dominated, dominant);
        assert!(vp.swapped);
        assert_eq!((labels.0.cost, labels.0.cu), (dominant.cost, dominant.cu));
    }

    #[test]
    fn label_pair_joint_cost_is_spectrum_cost_product_sum() {
        let adaptive = AdaptiveUnits::new(n64(8.0));
        let pair = LabelPair::new(label(2.0, 0, 4), label(3.0, 0, 4));
        // units(1, 2.0) = 2, units(1, 3.0) = 3 at reach 8 (see units.rs's
        // reference table), so joint cost is 2*2 + 3*3 = 13, not 2+3 = 5.
        assert_eq!(pair.joint_cost(1, &adaptive), n64(13.0));
    }
}
