//! Server builder and accept loop: ties transport, router and hub
//! together and spawns one handler task per connection.

use std::path::PathBuf;
use std::sync::Arc;

use wordspy_protocol::JsonCodec;
use wordspy_room::{ActionRouter, WordPools};
use wordspy_transport::{Hub, Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::WordspyError;

/// Builder for configuring and starting a server.
pub struct WordspyServerBuilder {
    bind_addr: String,
    words_dir: PathBuf,
}

impl WordspyServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            words_dir: PathBuf::from("server"),
        }
    }

    /// Sets the address to listen on.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the directory holding the word-list files.
    pub fn words_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.words_dir = dir.into();
        self
    }

    /// Loads the word pools and binds the listener. Either failing is
    /// fatal: a server without words or a port is useless.
    pub async fn build(self) -> Result<WordspyServer, WordspyError> {
        let pools = WordPools::load(&self.words_dir)?;
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        Ok(WordspyServer {
            transport,
            router: ActionRouter::new(Arc::new(pools)),
            hub: Hub::new(),
        })
    }
}

impl Default for WordspyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running game server.
pub struct WordspyServer {
    transport: WebSocketTransport,
    router: ActionRouter,
    hub: Hub,
}

impl WordspyServer {
    pub fn builder() -> WordspyServerBuilder {
        WordspyServerBuilder::new()
    }

    /// The locally bound address.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Accepts connections until the process dies.
    pub async fn run(mut self) -> Result<(), WordspyError> {
        tracing::info!("wordspy server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let router = self.router.clone();
                    let hub = self.hub.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, router, hub, JsonCodec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
