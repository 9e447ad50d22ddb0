//! Canonical join graph shapes with closed-form cross-product free counts.

use super::enumerator::JoinEnumerator;
use super::math::{catalan, factorial};
use crate::config::EnumeratorConfig;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// t0 - t1 - ... - t{n-1}
    Chain,
    /// t0 joined to every other table
    Star,
    /// Every pair of tables joined
    Clique,
}

impl Topology {
    pub const ALL: [Topology; 3] = [Topology::Chain, Topology::Star, Topology::Clique];

    /// Name of the i-th table of a generated graph.
    pub fn table(index: usize) -> String {
        format!("t{}", index)
    }

    /// Build an enumerator over `inputs` tables connected in this shape.
    pub fn build(self, inputs: usize) -> Result<JoinEnumerator> {
        self.build_with_config(inputs, EnumeratorConfig::default())
    }

    pub fn build_with_config(self, inputs: usize, config: EnumeratorConfig) -> Result<JoinEnumerator> {
        let mut enumerator = JoinEnumerator::with_config(config)?;
        if inputs == 0 {
            return Ok(enumerator);
        }

        enumerator.add_table(&Self::table(0))?;
        match self {
            Topology::Chain => {
                for i in 1..inputs {
                    enumerator.add_join_condition(&Self::table(i - 1), &Self::table(i))?;
                }
            }
            Topology::Star => {
                for i in 1..inputs {
                    enumerator.add_join_condition(&Self::table(0), &Self::table(i))?;
                }
            }
            Topology::Clique => {
                for i in 0..inputs {
                    for j in (i + 1)..inputs {
                        enumerator.add_join_condition(&Self::table(i), &Self::table(j))?;
                    }
                }
            }
        }
        Ok(enumerator)
    }

    /// Closed-form number of cross-product free bushy trees.
    pub fn expected_count(self, inputs: usize) -> u64 {
        if inputs == 0 {
            return 0;
        }
        let n = inputs as u64;
        match self {
            Topology::Chain => (1u64 << (n - 1)) * catalan(n - 1),
            Topology::Star => (1u64 << (n - 1)) * factorial(n - 1),
            Topology::Clique => factorial(n) * catalan(n - 1),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::Chain => "chain",
            Topology::Star => "star",
            Topology::Clique => "clique",
        };
        f.write_str(name)
    }
}

impl FromStr for Topology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chain" => Ok(Topology::Chain),
            "star" => Ok(Topology::Star),
            "clique" => Ok(Topology::Clique),
            other => Err(Error::InvalidArgument(format!("Unknown topology: {}", other))),
        }
    }
}
