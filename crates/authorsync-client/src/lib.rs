//! Client-side session synchronization for Authorsync.
//!
//! Maintains authoritative local state for a remote repository-editing
//! session over one persistent WebSocket. The connection manager owns the
//! transport and republishes every inbound fact; two projections fold the
//! message stream into derived state slots with deterministic invalidation
//! cascades, so selecting a new upstream entity always clears stale
//! downstream selections.
//!
//! ```no_run
//! use std::sync::Arc;
//! use authorsync_client::{Connection, ConnectionStatus, EndpointConfig, Message, Session};
//!
//! # async fn run() {
//! let session = Arc::new(Session::new());
//! let connection = Connection::connect(
//!     &EndpointConfig::new("localhost", 6543),
//!     Arc::clone(&session),
//! );
//! let mut status = session.watch_status();
//! status
//!     .wait_for(|s| *s == ConnectionStatus::Ready)
//!     .await
//!     .unwrap();
//! connection.send(Message::CloneRepository {
//!     url: "https://example.com/repo.git".into(),
//! });
//! # }
//! ```

mod block;
mod connection;
mod repository;
mod session;

pub use authorsync_core::{
    Block, BlockFile, Branch, ConnectionStatus, FileContent, Message, ProtocolError, Repository,
};
pub use block::BlockProjection;
pub use connection::{Connection, EndpointConfig};
pub use repository::RepositoryProjection;
pub use session::Session;
