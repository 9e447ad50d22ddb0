//! Join tree representation.
//!
//! A tree is either a [`Leaf`] holding a slot or table index, or a [`Join`] of
//! two subtrees. Every node carries a digest: a canonical string built
//! bottom-up (`"3"`, `"(0x1)"`, `"((0x1)x2)"`) so that structurally identical
//! trees compare, hash and memoize the same regardless of where they came from.

use crate::Result;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Canonical structural key of a subtree.
pub type Digest = Arc<str>;

#[derive(Debug, Clone)]
pub struct Leaf {
    index: usize,
    digest: Digest,
}

impl Leaf {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    left: Arc<Node>,
    right: Arc<Node>,
    digest: Digest,
}

impl Join {
    pub fn left(&self) -> &Node {
        &self.left
    }

    pub fn right(&self) -> &Node {
        &self.right
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Leaf(Leaf),
    Join(Join),
}

impl Node {
    pub fn leaf(index: usize) -> Self {
        Node::Leaf(Leaf {
            index,
            digest: Arc::from(index.to_string()),
        })
    }

    pub fn join(left: Node, right: Node) -> Self {
        Self::join_shared(Arc::new(left), Arc::new(right))
    }

    /// Join two subtrees without copying them.
    pub fn join_shared(left: Arc<Node>, right: Arc<Node>) -> Self {
        let digest = Arc::from(format!("({}x{})", left.digest(), right.digest()));
        Node::Join(Join {
            left,
            right,
            digest,
        })
    }

    pub fn digest(&self) -> &Digest {
        match self {
            Node::Leaf(leaf) => &leaf.digest,
            Node::Join(join) => &join.digest,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Join(join) => join.left.leaf_count() + join.right.leaf_count(),
        }
    }

    /// Traverse the tree bottom-up: both children are visited before their join.
    pub fn accept<S: Shuttle + ?Sized>(&self, shuttle: &mut S) -> Result<S::Output> {
        match self {
            Node::Leaf(leaf) => shuttle.visit_leaf(leaf),
            Node::Join(join) => {
                let left = join.left.accept(shuttle)?;
                let right = join.right.accept(shuttle)?;
                shuttle.visit_join(join, left, right)
            }
        }
    }
}

/// Bottom-up transform over a [`Node`] tree.
///
/// `visit_join` receives the original join together with the outputs already
/// produced for its left and right children.
pub trait Shuttle {
    type Output;

    fn visit_leaf(&mut self, leaf: &Leaf) -> Result<Self::Output>;

    fn visit_join(
        &mut self,
        join: &Join,
        left: Self::Output,
        right: Self::Output,
    ) -> Result<Self::Output>;
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.digest() == other.digest()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digest().hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digest().cmp(other.digest())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.digest())
    }
}
