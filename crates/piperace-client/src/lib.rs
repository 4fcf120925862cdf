//! piperace-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the client do?
//!
//! The client is the short-lived side of the stress setup.  Many client
//! processes are launched at once against a single server, and each one:
//!
//! 1. Connects to the server's named pipe, riding out the two race windows
//!    inherent in that operation (no listener exists yet, or another
//!    client steals the freed instance) under one overall timeout budget.
//! 2. Reads the line protocol the server streams back and validates its
//!    shape: one preamble, ten words, one end marker.
//! 3. Exits with a code describing what it observed, for the launching
//!    orchestrator to collect.

/// Application layer: use cases for the client.
pub mod application;

/// Infrastructure layer: the OS-facing connection primitives.
pub mod infrastructure;
