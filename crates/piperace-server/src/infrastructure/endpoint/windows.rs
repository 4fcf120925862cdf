//! Windows named pipe acceptor built on tokio's named pipe server.

use std::io;

use async_trait::async_trait;
use piperace_core::PipeEndpoint;
use tokio::net::windows::named_pipe::{NamedPipeServer, ServerOptions};

use super::PipeAcceptor;

/// Holds the currently armed pipe instance; `accept` replaces it with a
/// fresh instance before releasing the connected one.
pub struct NamedPipeAcceptor {
    path: String,
    armed: NamedPipeServer,
}

impl NamedPipeAcceptor {
    /// Creates the first pipe instance for `endpoint` and arms it.
    ///
    /// Asserting `first_pipe_instance` makes a second server on the same
    /// endpoint fail here instead of silently splitting the client stream.
    pub fn bind(endpoint: &PipeEndpoint) -> io::Result<Self> {
        let path = endpoint.path();
        let armed = ServerOptions::new()
            .first_pipe_instance(true)
            .create(&path)?;
        Ok(Self { path, armed })
    }
}

#[async_trait]
impl PipeAcceptor for NamedPipeAcceptor {
    type Channel = NamedPipeServer;

    async fn accept(&mut self) -> io::Result<NamedPipeServer> {
        self.armed.connect().await?;
        // Arm the next instance before handing this one off, so a client
        // that starts waiting right now still finds a listener.
        let next = ServerOptions::new().create(&self.path)?;
        Ok(std::mem::replace(&mut self.armed, next))
    }
}
