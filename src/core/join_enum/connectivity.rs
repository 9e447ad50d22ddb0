//! Template instantiation and cross-product detection.

use super::node::{Digest, Join, Leaf, Node, Shuttle};
use super::registry::{JoinConditionSet, TableId};
use crate::{Error, Result};
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Replace every leaf slot `i` of `template` with `order[i]`.
pub fn instantiate(template: &Node, order: &[TableId]) -> Result<Node> {
    let root = template.accept(&mut LeafRewriter { order })?;
    Ok(Arc::try_unwrap(root).unwrap_or_else(|shared| shared.as_ref().clone()))
}

struct LeafRewriter<'a> {
    order: &'a [TableId],
}

impl Shuttle for LeafRewriter<'_> {
    type Output = Arc<Node>;

    fn visit_leaf(&mut self, leaf: &Leaf) -> Result<Arc<Node>> {
        let table = self
            .order
            .get(leaf.index())
            .ok_or_else(|| Error::InvalidOperation {
                reason: format!(
                    "Template slot {} is outside an order of {} tables",
                    leaf.index(),
                    self.order.len()
                ),
            })?;
        Ok(Arc::new(Node::leaf(*table)))
    }

    fn visit_join(&mut self, _join: &Join, left: Arc<Node>, right: Arc<Node>) -> Result<Arc<Node>> {
        Ok(Arc::new(Node::join_shared(left, right)))
    }
}

/// Identifies a join of two subtrees by their digests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JoinKey {
    left: Digest,
    right: Digest,
}

/// Decides whether instantiated trees contain cross products.
///
/// Owns the memo caches of a single enumeration run. Both caches are keyed by
/// subtree digests, so the same subtree reached from different (template,
/// order) pairs is resolved once. Workers share one checker; racing inserts
/// for a key always carry the same value.
pub struct ConnectivityChecker<'a> {
    conditions: &'a JoinConditionSet,
    inputs: DashMap<Digest, Arc<BTreeSet<TableId>>>,
    connected: DashMap<JoinKey, bool>,
}

impl<'a> ConnectivityChecker<'a> {
    pub fn new(conditions: &'a JoinConditionSet) -> Self {
        Self {
            conditions,
            inputs: DashMap::new(),
            connected: DashMap::new(),
        }
    }

    /// True iff every join in `tree` has a join condition between its sides.
    pub fn is_cross_product_free(&self, tree: &Node) -> Result<bool> {
        let mut shuttle = ConnectedJoinShuttle {
            checker: self,
            connected: true,
        };
        tree.accept(&mut shuttle)?;
        Ok(shuttle.connected)
    }

    /// Whether any table of `left` has a join condition with any table of `right`.
    pub fn has_join_condition(&self, left: &Node, right: &Node) -> Result<bool> {
        let key = JoinKey {
            left: Arc::clone(left.digest()),
            right: Arc::clone(right.digest()),
        };
        if let Some(verdict) = self.connected.get(&key).map(|v| *v) {
            return Ok(verdict);
        }

        let left_inputs = self.collect_inputs(left)?;
        let right_inputs = self.collect_inputs(right)?;
        let verdict = left_inputs.iter().any(|&l| {
            right_inputs
                .iter()
                .any(|&r| self.conditions.contains(l, r))
        });

        self.connected.insert(key, verdict);
        Ok(verdict)
    }

    /// Tables present in the leaves of `node`.
    pub fn collect_inputs(&self, node: &Node) -> Result<Arc<BTreeSet<TableId>>> {
        if let Some(inputs) = self.inputs.get(node.digest()).map(|e| Arc::clone(e.value())) {
            return Ok(inputs);
        }

        let mut collector = InputCollector::default();
        node.accept(&mut collector)?;
        let inputs = Arc::new(collector.inputs);
        self.inputs.insert(Arc::clone(node.digest()), Arc::clone(&inputs));
        Ok(inputs)
    }

    pub fn cached_input_sets(&self) -> usize {
        self.inputs.len()
    }

    pub fn cached_verdicts(&self) -> usize {
        self.connected.len()
    }

    pub fn clear(&self) {
        self.inputs.clear();
        self.connected.clear();
    }
}

struct ConnectedJoinShuttle<'c, 'a> {
    checker: &'c ConnectivityChecker<'a>,
    connected: bool,
}

impl Shuttle for ConnectedJoinShuttle<'_, '_> {
    type Output = ();

    fn visit_leaf(&mut self, _leaf: &Leaf) -> Result<()> {
        Ok(())
    }

    fn visit_join(&mut self, join: &Join, _left: (), _right: ()) -> Result<()> {
        // One cross product disqualifies the tree; skip lookups after that.
        if self.connected && !self.checker.has_join_condition(join.left(), join.right())? {
            self.connected = false;
        }
        Ok(())
    }
}

#[derive(Default)]
struct InputCollector {
    inputs: BTreeSet<TableId>,
}

impl Shuttle for InputCollector {
    type Output = ();

    fn visit_leaf(&mut self, leaf: &Leaf) -> Result<()> {
        self.inputs.insert(leaf.index());
        Ok(())
    }

    fn visit_join(&mut self, _join: &Join, _left: (), _right: ()) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> JoinConditionSet {
        let mut conditions = JoinConditionSet::new();
        for i in 1..n {
            conditions.insert(i - 1, i);
        }
        conditions
    }

    fn left_deep(n: usize) -> Node {
        (1..n).fold(Node::leaf(0), |acc, slot| Node::join(acc, Node::leaf(slot)))
    }

    #[test]
    fn test_instantiate_rewrites_leaves() {
        let template = Node::join(Node::leaf(0), Node::join(Node::leaf(1), Node::leaf(2)));
        let tree = instantiate(&template, &[2, 0, 1]).unwrap();
        assert_eq!(tree.to_string(), "(2x(0x1))");
        assert_eq!(template.to_string(), "(0x(1x2))");
    }

    #[test]
    fn test_instantiate_rejects_short_order() {
        let template = left_deep(3);
        let result = instantiate(&template, &[0, 1]);
        assert!(matches!(result, Err(Error::InvalidOperation { .. })));
    }

    #[test]
    fn test_chain_connectivity() {
        let conditions = chain(3);
        let checker = ConnectivityChecker::new(&conditions);

        // (AB)C and A(BC) are connected, (AC)B is a cross product.
        let ab_c = instantiate(&left_deep(3), &[0, 1, 2]).unwrap();
        let ac_b = instantiate(&left_deep(3), &[0, 2, 1]).unwrap();
        assert!(checker.is_cross_product_free(&ab_c).unwrap());
        assert!(!checker.is_cross_product_free(&ac_b).unwrap());
    }

    #[test]
    fn test_inner_cross_product_disqualifies_tree() {
        let conditions = chain(4);
        let checker = ConnectivityChecker::new(&conditions);

        // The root (0x2)x(1x3) is connected through 0-1, but 0x2 and 1x3 are not.
        let tree = Node::join(
            Node::join(Node::leaf(0), Node::leaf(2)),
            Node::join(Node::leaf(1), Node::leaf(3)),
        );
        assert!(!checker.is_cross_product_free(&tree).unwrap());
        assert!(checker
            .has_join_condition(
                &Node::join(Node::leaf(0), Node::leaf(2)),
                &Node::join(Node::leaf(1), Node::leaf(3)),
            )
            .unwrap());
    }

    #[test]
    fn test_caches_are_keyed_by_digest() {
        let conditions = chain(3);
        let checker = ConnectivityChecker::new(&conditions);

        let first = Node::join(Node::leaf(0), Node::leaf(1));
        let second = Node::join(Node::leaf(0), Node::leaf(1));
        let inputs = checker.collect_inputs(&first).unwrap();
        assert_eq!(inputs.iter().copied().collect::<Vec<_>>(), vec![0, 1]);

        checker.collect_inputs(&second).unwrap();
        assert_eq!(checker.cached_input_sets(), 1);

        checker.has_join_condition(&first, &Node::leaf(2)).unwrap();
        checker.has_join_condition(&second, &Node::leaf(2)).unwrap();
        assert_eq!(checker.cached_verdicts(), 1);

        checker.clear();
        assert_eq!(checker.cached_input_sets(), 0);
        assert_eq!(checker.cached_verdicts(), 0);
    }

    #[test]
    fn test_single_leaf_is_trivially_connected() {
        let conditions = JoinConditionSet::new();
        let checker = ConnectivityChecker::new(&conditions);
        assert!(checker.is_cross_product_free(&Node::leaf(0)).unwrap());
    }
}
