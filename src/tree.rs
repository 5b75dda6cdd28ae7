//! The shared parent-pointer search tree: every discovered vertex-pair state
//! is a node pointing back at the state it was reached from, so the two
//! paths can be reconstructed by walking up from a terminal node without
//! storing them eagerly at every step of the search.

use std::rc::Rc;

use crate::label::{LabelPair, VertexPair};

/// Which of the two paths advanced to produce this tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    First,
    Second,
}

/// One step of the search: the canonical vertex pair and label pair reached,
/// the edge taken to get here (and which path it extends), and a link back
/// to the state it was relaxed from. The root has no edge and no parent.
pub struct TreeNode<NId, E> {
    pub vertices: VertexPair<NId>,
    pub labels: LabelPair,
    pub step: Option<(E, Side)>,
    pub parent: Option<Rc<TreeNode<NId, E>>>,
}

impl<NId: Copy, E: Clone> TreeNode<NId, E> {
    pub fn root(vertices: VertexPair<NId>, labels: LabelPair) -> Rc<Self> {
        Rc::new(TreeNode {
            vertices,
            labels,
            step: None,
            parent: None,
        })
    }

    pub fn child(
        parent: &Rc<Self>,
        vertices: VertexPair<NId>,
        labels: LabelPair,
        edge: E,
        side: Side,
    ) -> Rc<Self> {
        Rc::new(TreeNode {
            vertices,
            labels,
            step: Some((edge, side)),
            parent: Some(Rc::clone(parent)),
        })
    }

    /// Walks the ancestor chain (this node included) looking for `edge_id`,
    /// on either path - reusing an edge on one path while routing the other
    /// is still a disjointness violation.
    pub fn uses_edge(&self, mut same_edge: impl FnMut(&E) -> bool) -> bool {
        let mut cur = self;
        loop {
            if let Some((e, _)) = &cur.step {
                if same_edge(e) {
                    return true;
                }
            }
            match &cur.parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::label::Label;
    use crate::units::CU;
    use noisy_float::prelude::n64;

    fn label(c: f64) -> Label {
        Label::new(n64(c), CU::new(0, 4))
    }

    #[test]
    fn ancestor_walk_finds_reused_edge() {
        let vp = VertexPair::new(0, 0);
        let lp = LabelPair::new(label(0.0), label(0.0));
        let root = TreeNode::root(vp, lp);
        let mid = TreeNode::child(&root, vp, lp, 7u32, Side::First);
        let leaf = TreeNode::child(&mid, vp, lp, 9u32, Side::Second);
        assert!(leaf.uses_edge(|e| *e == 7));
        assert!(!leaf.uses_edge(|e| *e == 42));
    }

    #[test]
    fn root_has_no_ancestors() {
        let vp = VertexPair::new(0, 1);
        let lp = LabelPair::new(label(0.0), label(0.0));
        let root: Rc<TreeNode<usize, u32>> = TreeNode::root(vp, lp);
        assert!(!root.uses_edge(|_| true));
    }
}
