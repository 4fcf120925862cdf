//! Canonical naming for the pipe endpoint.

use std::fmt;

/// Host scope meaning "the local machine".
pub const DEFAULT_HOST: &str = ".";

/// Channel name used when nothing else is configured.
pub const DEFAULT_PIPE_NAME: &str = "Test Pipe";

/// A named pipe endpoint: a host scope plus a channel name.
///
/// Resolved to the canonical path `\\<host>\pipe\<name>` used by every
/// native call.  Canonicalization is deterministic: the client and the
/// server must produce the identical path for a connection to succeed, so
/// both construct their path exclusively through [`PipeEndpoint::path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipeEndpoint {
    host: String,
    name: String,
}

impl PipeEndpoint {
    /// An endpoint on the local machine (host scope `"."`).
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            name: name.into(),
        }
    }

    /// An endpoint on a named host.
    pub fn on_host(host: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
        }
    }

    /// The host scope this endpoint lives on.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The channel name without the path decoration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical path form used by the OS-facing calls on both sides.
    pub fn path(&self) -> String {
        format!(r"\\{}\pipe\{}", self.host, self.name)
    }
}

impl Default for PipeEndpoint {
    fn default() -> Self {
        Self::local(DEFAULT_PIPE_NAME)
    }
}

impl fmt::Display for PipeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
