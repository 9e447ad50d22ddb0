pub mod join_enum;

pub use self::join_enum::{
    EnumerationStats, JoinEnumerator, JoinGraph, Node, Order, TableId, Topology,
};
