//! Parenthesization templates.
//!
//! A template is a join tree over anonymous leaf slots `0..n`. The set is built
//! by repeatedly contracting two adjacent entries of the working sequence into a
//! join, trying every merge position and backtracking. Different merge orders
//! can reach the same shape, so results are deduplicated by digest.

use super::node::Node;
use std::collections::HashSet;
use std::sync::Arc;

/// Every distinct full binary tree shape over `inputs` leaf slots, sorted by
/// digest. One template (a single leaf) for one input; none for zero.
pub fn generate_templates(inputs: usize) -> Vec<Node> {
    if inputs == 0 {
        return Vec::new();
    }

    let mut nodes: Vec<Arc<Node>> = (0..inputs).map(|slot| Arc::new(Node::leaf(slot))).collect();
    let mut templates = HashSet::new();
    contract(&mut nodes, &mut templates);

    let mut templates: Vec<Node> = templates.into_iter().collect();
    templates.sort();
    templates
}

fn contract(nodes: &mut Vec<Arc<Node>>, templates: &mut HashSet<Node>) {
    if nodes.len() == 1 {
        templates.insert(nodes[0].as_ref().clone());
        return;
    }

    for i in 0..nodes.len() - 1 {
        let right = nodes.remove(i + 1);
        let joined = Arc::new(Node::join_shared(Arc::clone(&nodes[i]), Arc::clone(&right)));
        let left = std::mem::replace(&mut nodes[i], joined);

        contract(nodes, templates);

        nodes[i] = left;
        nodes.insert(i + 1, right);
    }
}
