//! Repository projection: the `repository` and `branch` slots.

use authorsync_core::{Branch, Message, Repository};

/// Derived state for the cloned repository and its checked-out branch.
///
/// `None` means nothing cloned / no branch checked out. Mutated only through
/// [`apply`](RepositoryProjection::apply); consumers observe it through the
/// session's watch channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryProjection {
    pub repository: Option<Repository>,
    pub branch: Option<Branch>,
}

impl RepositoryProjection {
    /// Fold one inbound message into the slots.
    ///
    /// Returns whether the message touched this projection, so the session
    /// only notifies watchers on relevant messages.
    pub fn apply(&mut self, message: &Message) -> bool {
        match message {
            Message::Repository(repository) => {
                // A fresh clone invalidates any previously checked-out branch.
                self.repository = Some(repository.clone());
                self.branch = None;
                true
            }
            Message::Branch(branch) => {
                self.branch = Some(branch.clone());
                true
            }
            Message::RepositoryDeleted => {
                self.repository = None;
                self.branch = None;
                true
            }
            _ => false,
        }
    }
}
