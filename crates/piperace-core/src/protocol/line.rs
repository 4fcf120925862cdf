//! Line framer for the streamed word protocol.
//!
//! Wire format (newline-terminated UTF-8 text over a duplex byte stream):
//! ```text
//! You are connected to <worker-identity>
//! WORD: <word>            (exactly ten lines)
//! END OF STREAM
//! ```
//!
//! The framer is stateless: it turns [`ProtocolLine`] values into line text
//! and classifies received line text back into variants.  Ordering and count
//! rules live with the producer and the consumer, not here.

/// Prefix of the first line of every session.
pub const PREAMBLE_PREFIX: &str = "You are connected to ";

/// Prefix of each served word line.
pub const WORD_PREFIX: &str = "WORD: ";

/// The final line of a well-formed session.
pub const END_OF_STREAM: &str = "END OF STREAM";

/// Number of word lines in a well-formed session.
pub const WORDS_PER_SESSION: usize = 10;

/// One line of the streamed protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolLine {
    /// Identifies the serving worker to the client.
    Preamble(String),
    /// One served word.
    Word(String),
    /// Marks the end of the stream.
    EndOfStream,
}

/// Encodes a line without its trailing newline; the writer appends `\n`.
pub fn encode_line(line: &ProtocolLine) -> String {
    match line {
        ProtocolLine::Preamble(identity) => format!("{PREAMBLE_PREFIX}{identity}"),
        ProtocolLine::Word(word) => format!("{WORD_PREFIX}{word}"),
        ProtocolLine::EndOfStream => END_OF_STREAM.to_string(),
    }
}

/// Classifies a received line.
///
/// Returns `None` for anything that is not part of the protocol; consumers
/// ignore such lines rather than failing.  The end marker must match the
/// whole line exactly; the other two variants are recognized by prefix, so
/// an empty identity or an empty word still classifies.
pub fn parse_line(raw: &str) -> Option<ProtocolLine> {
    if let Some(identity) = raw.strip_prefix(PREAMBLE_PREFIX) {
        return Some(ProtocolLine::Preamble(identity.to_string()));
    }
    if let Some(word) = raw.strip_prefix(WORD_PREFIX) {
        return Some(ProtocolLine::Word(word.to_string()));
    }
    if raw == END_OF_STREAM {
        return Some(ProtocolLine::EndOfStream);
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
