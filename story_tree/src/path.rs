//! Paths - child-index addresses into a story tree.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Address of a node: one child index per tree depth. The empty path is the root.
///
/// Paths are transient coordinates and are never stored inside the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Path(Vec<usize>);

impl Path {
    /// The root address.
    pub fn root() -> Self {
        Self::default()
    }

    /// Address of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    /// Address of the parent node, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Path {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

impl From<&[usize]> for Path {
    fn from(segments: &[usize]) -> Self {
        Self(segments.to_vec())
    }
}

impl AsRef<[usize]> for Path {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "root");
        }
        let segments: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", segments.join("."))
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }
        s.split('.')
            .map(|segment| {
                segment
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| PathError::Malformed(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Why an address does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A segment indexes past the end of a node's children.
    #[error("no child {index} at depth {depth} (node has {len} children)")]
    OutOfRange {
        depth: usize,
        index: usize,
        len: usize,
    },

    /// Text that is not a dot-separated list of indices.
    #[error("malformed path '{0}'")]
    Malformed(String),
}
