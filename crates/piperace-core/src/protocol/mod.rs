//! Protocol module containing the line-based framer.

pub mod line;

pub use line::{encode_line, parse_line, ProtocolLine};
