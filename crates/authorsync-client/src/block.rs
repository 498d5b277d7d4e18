//! Block projection: the `block`, `selected_file`, and
//! `selected_file_content` slots.

use authorsync_core::{Block, BlockFile, FileContent, Message};

/// Derived state for the selected block and the file being edited within it.
///
/// Any upstream change (repository, branch) invalidates the whole group:
/// block identifiers are not assumed comparable across branch switches, so
/// nothing here survives one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockProjection {
    pub block: Option<Block>,
    pub selected_file: Option<BlockFile>,
    pub selected_file_content: Option<FileContent>,
}

impl BlockProjection {
    /// Fold one inbound message into the slots.
    ///
    /// Returns whether the message touched this projection.
    pub fn apply(&mut self, message: &Message) -> bool {
        match message {
            Message::Repository(_) | Message::Branch(_) | Message::RepositoryDeleted => {
                self.clear();
                true
            }
            Message::Block(block) => {
                // Re-selecting the same block also resets the file selection:
                // the listing may have changed underneath it.
                self.block = Some(block.clone());
                self.selected_file = None;
                self.selected_file_content = None;
                true
            }
            Message::FileContent(content) => {
                self.selected_file_content = Some(content.clone());
                true
            }
            _ => false,
        }
    }

    fn clear(&mut self) {
        self.block = None;
        self.selected_file = None;
        self.selected_file_content = None;
    }
}
