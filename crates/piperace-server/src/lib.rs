//! piperace-server library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the server do?
//!
//! The server is the single long-lived side of the stress setup.  It listens
//! on one named pipe endpoint forever and serves every client that connects:
//!
//! 1. Accept a connection and immediately re-arm the endpoint, so the next
//!    client never finds nobody listening.
//! 2. Hand the accepted channel to a fresh worker task.
//! 3. The worker streams the fixed protocol (a preamble naming the worker,
//!    ten randomly chosen words with randomized pacing, and an end marker),
//!    then closes the channel.
//!
//! Every line a worker emits is also echoed to a single console sink shared
//! by all workers, serialized so concurrent sessions stay readable.

/// Application layer: use cases for the server.
pub mod application;

/// Infrastructure layer: endpoint acceptance, the console sink, and storage.
pub mod infrastructure;
