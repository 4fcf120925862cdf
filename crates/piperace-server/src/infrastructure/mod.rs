//! Infrastructure layer for the server application.
//!
//! # Sub-modules
//!
//! - **`endpoint`** – Named pipe endpoint acceptance: the acceptor trait
//!   with its accept-then-re-arm discipline, the Windows implementation, a
//!   scripted in-memory acceptor for tests, and the accept loop that spawns
//!   one worker per connection.
//!
//! - **`console`** – The single console sink shared by every worker,
//!   serialized so concurrent sessions never interleave inside a line.
//!
//! - **`storage`** – File-system concerns: the TOML configuration file and
//!   the word list the workers serve from.

pub mod console;
pub mod endpoint;
pub mod storage;
