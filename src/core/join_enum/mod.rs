pub mod connectivity;
pub mod enumerator;
pub mod graph;
pub mod math;
pub mod node;
pub mod order;
pub mod registry;
pub mod template;
pub mod topology;

pub use connectivity::{instantiate, ConnectivityChecker};
pub use enumerator::{EnumerationStats, JoinEnumerator, PRACTICAL_INPUT_LIMIT};
pub use graph::JoinGraph;
pub use math::{catalan, factorial, search_space_size};
pub use node::{Digest, Join, Leaf, Node, Shuttle};
pub use order::{generate_orders, Order};
pub use registry::{JoinConditionKey, JoinConditionSet, TableId, TableRegistry};
pub use template::generate_templates;
pub use topology::Topology;
