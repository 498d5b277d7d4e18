//! Core types for Authorsync.
//!
//! This crate defines the wire protocol of a repository-editing session: the
//! closed set of messages exchanged with the authoring server, the file
//! descriptor used inside blocks, and the connection lifecycle that clients
//! observe. It carries no transport of its own; `authorsync-client` drives
//! these types over a WebSocket.

mod file;
mod message;

pub use file::BlockFile;
pub use message::{Block, Branch, FileContent, Message, ProtocolError, Repository};

/// Connection lifecycle state.
///
/// Driven only by transport events: a session starts `Initialising`, a
/// successful open moves it to `Ready`, and any close or failure moves it to
/// `Disconnected`. There is no automatic reconnect; `Disconnected` holds
/// until a new connect call starts the cycle over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The transport handshake has not completed yet.
    #[default]
    Initialising,
    /// The transport is open; messages flow in both directions.
    Ready,
    /// The transport closed or failed.
    Disconnected,
}
