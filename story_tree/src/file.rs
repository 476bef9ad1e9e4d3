//! Tree files - the JSON envelope a story tree is saved in.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path as FsPath, PathBuf};
use thiserror::Error;
use tracing::info;

use super::Node;

/// Marker identifying a tree file.
pub const APPLICATION_MARKER: &str = "VN-Organizer";

/// Errors reading or writing tree files.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tree file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not a tree file (application marker is '{0}')")]
    NotATreeFile(String),
}

/// A story tree together with the save directories it tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeFile {
    /// Always [`APPLICATION_MARKER`].
    pub application: String,

    /// Directory the game writes its saves to.
    pub primary_path: Option<PathBuf>,

    /// Optional mirror of the primary save directory.
    pub secondary_path: Option<PathBuf>,

    pub tree: Node,

    /// Opaque persistent-data blob, carried through unchanged.
    #[serde(default)]
    pub persistent: Option<String>,
}

impl TreeFile {
    /// Create a file holding an empty tree.
    pub fn new(primary_path: Option<PathBuf>, secondary_path: Option<PathBuf>) -> Self {
        Self {
            application: APPLICATION_MARKER.to_string(),
            primary_path,
            secondary_path,
            tree: Node::new(),
            persistent: None,
        }
    }

    /// Parse a tree file, checking the application marker.
    pub fn from_json_str(json: &str) -> Result<Self, StoryError> {
        let file: TreeFile = serde_json::from_str(json)?;
        if file.application != APPLICATION_MARKER {
            return Err(StoryError::NotATreeFile(file.application));
        }
        Ok(file)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, StoryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a tree file from disk.
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, StoryError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| StoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            leaves = file.tree.leaf_count(),
            "tree file loaded"
        );
        Ok(file)
    }

    /// Write this tree file to disk.
    pub fn save(&self, path: impl AsRef<FsPath>) -> Result<(), StoryError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|source| StoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "tree file saved");
        Ok(())
    }
}
