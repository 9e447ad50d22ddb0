use super::enumerator::JoinEnumerator;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Join graph as supplied by a planning front end.
///
/// ```json
/// { "tables": ["audit_log"], "edges": [["orders", "customer"], ["orders", "lineitem"]] }
/// ```
///
/// `tables` lists relations that may have no join condition at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGraph {
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl JoinGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edge(mut self, table1: impl Into<String>, table2: impl Into<String>) -> Self {
        self.edges.push((table1.into(), table2.into()));
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.tables.push(table.into());
        self
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::Serialization(format!("Invalid join graph: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse an edge written as `left:right`.
    pub fn parse_edge(edge: &str) -> Result<(String, String)> {
        match edge.split_once(':') {
            Some((left, right)) if !left.trim().is_empty() && !right.trim().is_empty() => {
                Ok((left.trim().to_string(), right.trim().to_string()))
            }
            _ => Err(Error::InvalidArgument(format!(
                "Edge must be written as left:right, got {:?}",
                edge
            ))),
        }
    }

    /// Register every edge, then every standalone table.
    pub fn register(&self, enumerator: &mut JoinEnumerator) -> Result<()> {
        for (left, right) in &self.edges {
            enumerator.add_join_condition(left, right)?;
        }
        for table in &self.tables {
            enumerator.add_table(table)?;
        }
        Ok(())
    }
}
