//! `GridclashServer` builder and accept loop.
//!
//! This is the entry point for running a Gridclash game server. It ties
//! together all the layers: transport → protocol → room → engine.

use std::future::Future;
use std::sync::Arc;

use gridclash_protocol::{Codec, JsonCodec};
use gridclash_room::{RoomConfig, RoomHandle, spawn_room};
use gridclash_transport::{Transport, TransportError, WebSocketTransport};

use crate::GridclashError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The room
/// handle is itself a channel sender, so no locking is needed here.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) room: RoomHandle,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Gridclash server.
///
/// # Example
///
/// ```rust,no_run
/// use gridclash::prelude::*;
///
/// # async fn run() -> Result<(), GridclashError> {
/// let server = GridclashServer::builder()
///     .bind("0.0.0.0:3000")
///     .room_config(RoomConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GridclashServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl GridclashServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Validates the configuration, binds the listener, and starts the
    /// room actor.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<GridclashServer<JsonCodec>, GridclashError> {
        self.room_config.validate()?;
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let room = spawn_room(self.room_config)?;

        tracing::info!(addr = %self.bind_addr, "gridclash server bound");

        let state = Arc::new(ServerState {
            room,
            codec: JsonCodec,
        });

        Ok(GridclashServer { transport, state })
    }
}

impl Default for GridclashServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Gridclash game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridclashServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GridclashServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GridclashServerBuilder {
        GridclashServerBuilder::new()
    }
}

impl<C: Codec + Clone> GridclashServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the room, for querying its state.
    pub fn room(&self) -> RoomHandle {
        self.state.room.clone()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), GridclashError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes, then stops
    /// accepting and shuts the room down.
    ///
    /// Connections already being handled are not waited for.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), GridclashError> {
        tracing::info!("gridclash server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(
                                    error = %e,
                                    "connection ended with error"
                                );
                            }
                        });
                    }
                    Err(TransportError::Shutdown) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        tracing::info!("gridclash server shutting down");
        self.transport.shutdown().await?;
        // The room may already be gone; that is fine at this point.
        let _ = self.state.room.shutdown().await;
        Ok(())
    }
}
