//! Error types for the transport layer.

#[cfg(feature = "websocket")]
use tokio_tungstenite::tungstenite;

/// Errors raised while listening on, upgrading, or talking over a socket.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listener could not be bound to `addr`.
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The TCP accept itself failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The peer connected but the WebSocket upgrade failed.
    #[cfg(feature = "websocket")]
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    /// Writing or flushing a frame failed.
    #[cfg(feature = "websocket")]
    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),

    /// Reading a frame failed.
    #[cfg(feature = "websocket")]
    #[error("receive failed: {0}")]
    Receive(#[source] tungstenite::Error),

    /// `accept` was called after `shutdown`.
    #[error("transport shut down")]
    Shutdown,
}

impl TransportError {
    /// `true` when the peer is simply gone and there is nothing to report.
    pub fn is_disconnect(&self) -> bool {
        match self {
            #[cfg(feature = "websocket")]
            Self::Send(e) | Self::Receive(e) => matches!(
                e,
                tungstenite::Error::ConnectionClosed
                    | tungstenite::Error::AlreadyClosed
                    | tungstenite::Error::Protocol(
                        tungstenite::error::ProtocolError::ResetWithoutClosingHandshake
                    )
            ),
            _ => false,
        }
    }
}
