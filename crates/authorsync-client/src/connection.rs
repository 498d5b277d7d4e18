//! Connection manager: owns the WebSocket transport and drives a session.

use std::sync::Arc;

use authorsync_core::{ConnectionStatus, Message};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::Session;

/// Where the authoring server lives.
///
/// [`url`](EndpointConfig::url) joins the pieces as
/// `{ws|wss}://{host}:{port}{basepath}api`, the path the server mounts its
/// WebSocket API at. `secure` selects `wss`; the embedder sets it from its
/// environment, and `wss` endpoints additionally require a TLS feature on
/// `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
    /// Mount path of the server; a trailing slash is added when missing.
    pub basepath: String,
    pub secure: bool,
}

impl EndpointConfig {
    /// Insecure endpoint at the server's default mount path.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            basepath: "/".into(),
            secure: false,
        }
    }

    /// The WebSocket URL of the server's API endpoint.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let slash = if self.basepath.ends_with('/') { "" } else { "/" };
        format!(
            "{scheme}://{}:{}{}{slash}api",
            self.host, self.port, self.basepath
        )
    }
}

/// Handle to one live transport.
///
/// Each [`connect`](Connection::connect) call opens exactly one transport;
/// calling it twice opens two, so guarding against double-connect is the
/// caller's job. Dropping the handle tears the transport down.
pub struct Connection {
    session: Arc<Session>,
    outbound: mpsc::UnboundedSender<Message>,
    driver: JoinHandle<()>,
}

impl Connection {
    /// Open a transport to `config` and start driving `session` from it.
    ///
    /// Returns immediately; the session's status watch reports the handshake
    /// outcome (`Ready` on open, `Disconnected` on failure). There is no
    /// automatic reconnect: once `Disconnected`, only a new `connect` call
    /// starts a new lifecycle.
    pub fn connect(config: &EndpointConfig, session: Arc<Session>) -> Self {
        session.set_status(ConnectionStatus::Initialising);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let driver = tokio::spawn(drive(config.url(), Arc::clone(&session), outbound_rx));
        Self {
            session,
            outbound,
            driver,
        }
    }

    /// Send an intent to the server.
    ///
    /// A no-op unless the transport is open: messages sent while
    /// initialising or disconnected are dropped, not queued.
    pub fn send(&self, message: Message) {
        if self.session.status() != ConnectionStatus::Ready {
            tracing::debug!(?message, "dropping send while transport is not open");
            return;
        }
        let _ = self.outbound.send(message);
    }

    /// The session this connection drives.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Close the transport.
    ///
    /// Slots keep their values; only a `repository-deleted` fact or
    /// [`Session::reset`] clears them.
    pub fn close(&self) {
        self.driver.abort();
        self.session.set_status(ConnectionStatus::Disconnected);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.driver.abort();
        self.session.set_status(ConnectionStatus::Disconnected);
    }
}

/// Single event path for one transport: every inbound frame is decoded and
/// fully projected before the next is read, so observers never see a partial
/// cascade.
async fn drive(url: String, session: Arc<Session>, mut outbound: mpsc::UnboundedReceiver<Message>) {
    let stream = match connect_async(&url).await {
        Ok((stream, _response)) => stream,
        Err(error) => {
            tracing::warn!(%url, %error, "connection failed");
            session.set_status(ConnectionStatus::Disconnected);
            return;
        }
    };
    tracing::debug!(%url, "connection open");
    session.set_status(ConnectionStatus::Ready);

    let (mut sink, mut inbound) = stream.split();
    loop {
        tokio::select! {
            frame = inbound.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => match Message::decode(text.as_str()) {
                    Ok(message) => session.apply(message),
                    Err(error) => tracing::warn!(%error, "dropping undecodable frame"),
                },
                Some(Ok(WsMessage::Close(_))) | None => break,
                // Pings are answered by tungstenite; binary frames are not
                // part of the protocol.
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::warn!(%error, "transport error");
                    break;
                }
            },
            message = outbound.recv() => {
                // The sender half lives in the Connection handle; None means
                // the handle is gone and the transport goes with it.
                let Some(message) = message else { break };
                match message.encode() {
                    Ok(frame) => {
                        if sink.send(WsMessage::text(frame)).await.is_err() {
                            break;
                        }
                    }
                    Err(error) => tracing::warn!(%error, "dropping unencodable message"),
                }
            }
        }
    }
    tracing::debug!(%url, "connection closed");
    session.set_status(ConnectionStatus::Disconnected);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_basepath_and_api() {
        let config = EndpointConfig::new("localhost", 6543);
        assert_eq!(config.url(), "ws://localhost:6543/api");
    }

    #[test]
    fn url_normalizes_missing_trailing_slash() {
        let mut config = EndpointConfig::new("localhost", 6543);
        config.basepath = "/author".into();
        assert_eq!(config.url(), "ws://localhost:6543/author/api");
        config.basepath = "/author/".into();
        assert_eq!(config.url(), "ws://localhost:6543/author/api");
    }

    #[test]
    fn url_secure_scheme() {
        let mut config = EndpointConfig::new("example.com", 443);
        config.secure = true;
        assert_eq!(config.url(), "wss://example.com:443/api");
    }
}
