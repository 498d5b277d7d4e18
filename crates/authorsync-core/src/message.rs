//! Protocol messages.
//!
//! A single closed union covers both directions of the wire: intents the
//! client sends and facts the server reports back. Every frame is one JSON
//! object discriminated by its `type` field; unknown discriminators are a
//! decode error, never silently ignored.

use crate::BlockFile;
use serde::{Deserialize, Serialize};

/// Repository fact: the branches available after a clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub branches: Vec<String>,
}

/// Branch fact: the ordered block identifiers on the checked-out branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub blocks: Vec<String>,
}

/// Block fact: the selected block's path and the files it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub path: String,
    pub files: Vec<BlockFile>,
}

/// File-content fact for the most recently requested file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub content: String,
}

/// Messages exchanged with the authoring server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    // Client -> Server intents
    /// Clone the repository at `url`, replacing any existing clone.
    CloneRepository { url: String },
    /// Delete the current clone.
    DeleteRepository,
    /// Check out the named branch, fetching it from the remote if needed.
    CheckoutBranch { branch: String },
    /// Select a block and request its file listing.
    SelectBlock { block: String },
    /// Request the content of one file within a block.
    LoadFileContent { block: String, file: BlockFile },
    /// Write updated content for one file within a block.
    SaveFileContent {
        block: String,
        file: BlockFile,
        content: String,
    },
    /// Create an empty file within a block.
    AddFile { block: String, file: BlockFile },
    /// Remove a file from a block.
    DeleteFile { block: String, file: BlockFile },
    /// Commit and push all pending changes.
    CommitChanges {
        name: String,
        email: String,
        message: String,
    },
    /// Revert all pending changes.
    DiscardChanges,

    // Server -> Client facts
    Repository(Repository),
    RepositoryDeleted,
    Branch(Branch),
    Block(Block),
    FileContent(FileContent),
    /// A render of the current block has started.
    FileRendering,
    /// A render finished; `url` points at the rendered page, `output` carries
    /// the build log.
    FileRendered { url: String, output: String },
    ChangesCommitted,
    ChangesDiscarded,
    /// The working tree has uncommitted changes.
    ChangesFound,
    /// The working tree is clean.
    NoChangesFound,
}

impl Message {
    /// Decode a single wire frame.
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }

    /// Encode into a single wire frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// Error at the wire boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid frame: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unencodable message: {0}")]
    Encode(#[source] serde_json::Error),
}
