//! File identity within a block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one file inside a block by directory and filename.
///
/// A plain value type: two descriptors refer to the same file exactly when
/// both fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockFile {
    /// Directory relative to the block root; empty for files at the root.
    pub directory: String,
    /// Filename within `directory`.
    pub filename: String,
}

impl BlockFile {
    /// Create a new file descriptor.
    pub fn new(directory: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
        }
    }

    /// Path of the file relative to the block root.
    pub fn relative_path(&self) -> String {
        if self.directory.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", self.directory, self.filename)
        }
    }
}

impl fmt::Display for BlockFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}
