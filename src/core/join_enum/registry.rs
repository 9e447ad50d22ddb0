use crate::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Dense identifier of a registered relation, assigned in first-seen order.
pub type TableId = usize;

/// Maps relation names to stable identifiers.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    names: Vec<String>,
    ids: HashMap<String, TableId>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` to its identifier, registering it if unseen.
    pub fn resolve(&mut self, name: &str) -> Result<TableId> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "Table name must not be empty".to_string(),
            ));
        }

        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }

        let id = self.names.len();
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        tracing::trace!(table = name, id, "Registered table");
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<TableId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: TableId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Unordered pair of tables connected by a join predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinConditionKey {
    first: TableId,
    second: TableId,
}

impl JoinConditionKey {
    pub fn new(a: TableId, b: TableId) -> Self {
        if a > b {
            Self { first: b, second: a }
        } else {
            Self { first: a, second: b }
        }
    }

    pub fn tables(&self) -> (TableId, TableId) {
        (self.first, self.second)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinConditionSet {
    conditions: HashSet<JoinConditionKey>,
}

impl JoinConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the pair was not present yet.
    pub fn insert(&mut self, a: TableId, b: TableId) -> bool {
        self.conditions.insert(JoinConditionKey::new(a, b))
    }

    /// Whether a predicate directly connects `a` and `b`. Joining two inputs
    /// without one is a cross product.
    pub fn contains(&self, a: TableId, b: TableId) -> bool {
        self.conditions.contains(&JoinConditionKey::new(a, b))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JoinConditionKey> {
        self.conditions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut registry = TableRegistry::new();
        assert_eq!(registry.resolve("orders").unwrap(), 0);
        assert_eq!(registry.resolve("customer").unwrap(), 1);
        assert_eq!(registry.resolve("orders").unwrap(), 0);
        assert_eq!(registry.resolve("nation").unwrap(), 2);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("customer"), Some(1));
        assert_eq!(registry.name(2), Some("nation"));
        assert_eq!(registry.get("region"), None);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = TableRegistry::new();
        assert!(matches!(registry.resolve(""), Err(Error::InvalidArgument(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_conditions_are_symmetric_and_deduplicated() {
        let mut conditions = JoinConditionSet::new();
        assert!(conditions.insert(0, 1));
        assert!(!conditions.insert(1, 0));
        assert!(conditions.insert(2, 1));

        assert_eq!(conditions.len(), 2);
        assert!(conditions.contains(1, 0));
        assert!(conditions.contains(1, 2));
        assert!(!conditions.contains(0, 2));
        assert_eq!(JoinConditionKey::new(5, 3).tables(), (3, 5));
    }
}
