//! Scripted in-memory acceptor for exercising the accept loop in tests.

use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;
use tokio::io::DuplexStream;

use super::PipeAcceptor;

/// Yields a fixed queue of in-memory duplex channels, then an error so the
/// accept loop under test terminates.
pub struct ScriptedAcceptor {
    channels: VecDeque<DuplexStream>,
}

impl ScriptedAcceptor {
    /// Builds the acceptor plus the client-side halves, in accept order.
    pub fn with_sessions(count: usize) -> (Self, Vec<DuplexStream>) {
        let mut server_halves = VecDeque::with_capacity(count);
        let mut client_halves = Vec::with_capacity(count);
        for _ in 0..count {
            let (server, client) = tokio::io::duplex(4096);
            server_halves.push_back(server);
            client_halves.push(client);
        }
        (
            Self {
                channels: server_halves,
            },
            client_halves,
        )
    }
}

#[async_trait]
impl PipeAcceptor for ScriptedAcceptor {
    type Channel = DuplexStream;

    async fn accept(&mut self) -> io::Result<DuplexStream> {
        self.channels
            .pop_front()
            .ok_or_else(|| io::Error::other("no more scripted clients"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
