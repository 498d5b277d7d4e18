//! The session object owning every derived state slot.

use authorsync_core::{
    Block, BlockFile, Branch, ConnectionStatus, FileContent, Message, Repository,
};
use tokio::sync::{broadcast, watch};

use crate::{BlockProjection, RepositoryProjection};

/// Buffered inbound messages per lagging subscriber.
const MESSAGE_BUFFER: usize = 64;

/// One editing session's derived state.
///
/// Owns the connection status and the two slot-group projections, and
/// republishes every inbound message on a broadcast stream. All mutation
/// happens on the connection driver's single event path (plus the
/// consumer-driven [`select_file`](Session::select_file)), so watchers always
/// observe a fully settled cascade, never a partial one.
///
/// The session outlives any single transport: slots survive a disconnect and
/// are only cleared by a `repository-deleted` fact or an explicit
/// [`reset`](Session::reset).
pub struct Session {
    status: watch::Sender<ConnectionStatus>,
    repository: watch::Sender<RepositoryProjection>,
    blocks: watch::Sender<BlockProjection>,
    messages: broadcast::Sender<Message>,
}

impl Session {
    /// Create a session with every slot empty and status `Initialising`.
    pub fn new() -> Self {
        let (status, _) = watch::channel(ConnectionStatus::default());
        let (repository, _) = watch::channel(RepositoryProjection::default());
        let (blocks, _) = watch::channel(BlockProjection::default());
        let (messages, _) = broadcast::channel(MESSAGE_BUFFER);
        Self {
            status,
            repository,
            blocks,
            messages,
        }
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Watch connection status changes.
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Watch the repository/branch slot group.
    pub fn watch_repository(&self) -> watch::Receiver<RepositoryProjection> {
        self.repository.subscribe()
    }

    /// Watch the block/selected-file slot group.
    pub fn watch_blocks(&self) -> watch::Receiver<BlockProjection> {
        self.blocks.subscribe()
    }

    /// Subscribe to the republished inbound message stream.
    ///
    /// Every decoded frame is delivered exactly once per subscriber, in
    /// arrival order, after both projections have been updated for it.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<Message> {
        self.messages.subscribe()
    }

    /// The cloned repository, if any.
    pub fn repository(&self) -> Option<Repository> {
        self.repository.borrow().repository.clone()
    }

    /// The checked-out branch, if any.
    pub fn branch(&self) -> Option<Branch> {
        self.repository.borrow().branch.clone()
    }

    /// The selected block, if any.
    pub fn block(&self) -> Option<Block> {
        self.blocks.borrow().block.clone()
    }

    /// The file the consumer is currently viewing, if any.
    pub fn selected_file(&self) -> Option<BlockFile> {
        self.blocks.borrow().selected_file.clone()
    }

    /// The last received content for the selected file, if any.
    pub fn selected_file_content(&self) -> Option<FileContent> {
        self.blocks.borrow().selected_file_content.clone()
    }

    /// Record which file the consumer is viewing.
    ///
    /// This is the one consumer-written slot: set it before sending the
    /// `load-file-content` intent whose `file-content` fact it pairs with.
    /// Cascades still clear it whenever the block, branch, or repository
    /// changes.
    pub fn select_file(&self, file: Option<BlockFile>) {
        self.blocks.send_if_modified(|projection| {
            if projection.selected_file == file {
                false
            } else {
                projection.selected_file = file;
                true
            }
        });
    }

    /// Tear the session down: every slot back to its initial empty value.
    pub fn reset(&self) {
        self.repository.send_if_modified(|projection| {
            let changed = *projection != RepositoryProjection::default();
            *projection = RepositoryProjection::default();
            changed
        });
        self.blocks.send_if_modified(|projection| {
            let changed = *projection != BlockProjection::default();
            *projection = BlockProjection::default();
            changed
        });
    }

    /// Dispatch one inbound message to both projections, then republish it.
    ///
    /// Called from the connection driver only, one message at a time; a
    /// projection a message does not touch is not notified.
    pub(crate) fn apply(&self, message: Message) {
        self.repository
            .send_if_modified(|projection| projection.apply(&message));
        self.blocks
            .send_if_modified(|projection| projection.apply(&message));
        // Nobody listening is fine.
        let _ = self.messages.send(message);
    }

    pub(crate) fn set_status(&self, status: ConnectionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(frame: &str) -> Message {
        Message::decode(frame).unwrap()
    }

    /// Drives the session through the clone → checkout → select sequence.
    fn populated() -> Session {
        let session = Session::new();
        session.apply(fact(r#"{"type":"repository","branches":["main","dev"]}"#));
        session.apply(fact(r#"{"type":"branch","blocks":["b1","b2"]}"#));
        session.apply(fact(
            r#"{"type":"block","path":"/b1","files":[{"directory":"x","filename":"y.md"}]}"#,
        ));
        session
    }

    #[test]
    fn clone_checkout_select_sequence() {
        let session = populated();
        assert_eq!(session.repository().unwrap().branches, vec!["main", "dev"]);
        assert_eq!(session.branch().unwrap().blocks, vec!["b1", "b2"]);
        let block = session.block().unwrap();
        assert_eq!(block.path, "/b1");
        assert_eq!(block.files, vec![BlockFile::new("x", "y.md")]);
        assert_eq!(session.selected_file(), None);
        assert_eq!(session.selected_file_content(), None);
    }

    #[test]
    fn file_content_only_touches_its_slot() {
        let session = populated();
        session.select_file(Some(BlockFile::new("x", "y.md")));
        let block_before = session.block();
        session.apply(fact(r#"{"type":"file-content","content":"hello"}"#));
        assert_eq!(session.selected_file_content().unwrap().content, "hello");
        assert_eq!(session.block(), block_before);
        assert_eq!(session.selected_file(), Some(BlockFile::new("x", "y.md")));
    }

    #[test]
    fn repository_deleted_clears_all_five_slots() {
        let session = populated();
        session.select_file(Some(BlockFile::new("x", "y.md")));
        session.apply(fact(r#"{"type":"file-content","content":"hello"}"#));
        session.apply(fact(r#"{"type":"repository-deleted"}"#));
        assert_eq!(session.repository(), None);
        assert_eq!(session.branch(), None);
        assert_eq!(session.block(), None);
        assert_eq!(session.selected_file(), None);
        assert_eq!(session.selected_file_content(), None);
    }

    #[test]
    fn branch_fact_invalidates_downstream_regardless_of_prior_state() {
        let session = populated();
        session.select_file(Some(BlockFile::new("x", "y.md")));
        session.apply(fact(r#"{"type":"file-content","content":"hello"}"#));
        session.apply(fact(r#"{"type":"branch","blocks":["b3"]}"#));
        assert_eq!(session.branch().unwrap().blocks, vec!["b3"]);
        assert_eq!(session.block(), None);
        assert_eq!(session.selected_file(), None);
        assert_eq!(session.selected_file_content(), None);
    }

    #[test]
    fn untouched_projections_are_not_notified() {
        let session = populated();
        let mut repository = session.watch_repository();
        let mut blocks = session.watch_blocks();
        repository.mark_unchanged();
        blocks.mark_unchanged();

        session.apply(fact(r#"{"type":"file-content","content":"hello"}"#));
        assert!(!repository.has_changed().unwrap());
        assert!(blocks.has_changed().unwrap());
    }

    #[test]
    fn pass_through_facts_reach_subscribers_unchanged() {
        let session = populated();
        let mut messages = session.subscribe_messages();
        session.apply(fact(r#"{"type":"file-rendering"}"#));
        session.apply(fact(
            r#"{"type":"file-rendered","url":"/b1/y.html","output":"ok"}"#,
        ));
        session.apply(fact(r#"{"type":"changes-found"}"#));
        assert_eq!(messages.try_recv().unwrap(), Message::FileRendering);
        assert_eq!(
            messages.try_recv().unwrap(),
            Message::FileRendered {
                url: "/b1/y.html".into(),
                output: "ok".into(),
            }
        );
        assert_eq!(messages.try_recv().unwrap(), Message::ChangesFound);
    }

    #[test]
    fn reset_clears_everything() {
        let session = populated();
        session.select_file(Some(BlockFile::new("x", "y.md")));
        session.reset();
        assert_eq!(session.repository(), None);
        assert_eq!(session.branch(), None);
        assert_eq!(session.block(), None);
        assert_eq!(session.selected_file(), None);
        assert_eq!(session.selected_file_content(), None);
    }
}
