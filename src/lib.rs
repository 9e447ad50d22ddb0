//! Exhaustive bushy join-order enumeration with cross-product detection.
//!
//! Given relations and the join predicates connecting them, counts how many
//! bushy join trees over every leaf order never join two subtrees that share
//! no predicate. The search covers `n! * Catalan(n - 1)` trees, so it is a
//! reference tool for validating counting formulas on small graphs (about
//! eight relations), not a production planner.
//!
//! ```
//! use join_enumerator::JoinEnumerator;
//!
//! let mut enumerator = JoinEnumerator::new();
//! enumerator.add_join_condition("A", "B").unwrap();
//! enumerator.add_join_condition("B", "C").unwrap();
//! assert_eq!(enumerator.count().unwrap(), 8);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::config::{ConfigBuilder, ConfigSource, EnumeratorConfig};
pub use crate::core::join_enum::{
    catalan, factorial, generate_orders, generate_templates, instantiate, search_space_size,
    ConnectivityChecker, EnumerationStats, JoinEnumerator, JoinGraph, Node, Order, Shuttle,
    TableId, Topology, PRACTICAL_INPUT_LIMIT,
};
pub use crate::error::{Error, Result};
