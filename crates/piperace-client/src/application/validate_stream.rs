//! Stream validation: reads the server's lines and classifies the session.
//!
//! The reader is generic so tests can feed canned bytes, fault-injecting
//! mocks, or an in-memory channel; the binary feeds the connected pipe.
//! The pipe operates in byte mode, so "one message" is simply "one
//! newline-terminated line" and the buffered reader does the splitting.

use piperace_core::{parse_line, ProtocolLine, SessionOutcome, WORDS_PER_SESSION};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// What one session observed, beyond the bare outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    /// Word lines counted before the end marker (or end of input).
    pub words_seen: usize,
    /// The identity the preamble carried, when one was seen.
    pub server_identity: Option<String>,
}

impl SessionReport {
    fn new(outcome: SessionOutcome, words_seen: usize, server_identity: Option<String>) -> Self {
        Self {
            outcome,
            words_seen,
            server_identity,
        }
    }
}

/// Reads lines until the end marker or end of input and classifies the
/// protocol shape.
///
/// Unrecognized lines are ignored rather than failing: only the preamble,
/// the word count, and the end marker decide the outcome.
pub async fn validate_stream<R>(reader: R) -> SessionReport
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    // The very first line must be the preamble.
    let identity = match lines.next_line().await {
        Ok(Some(first)) => match parse_line(&first) {
            Some(ProtocolLine::Preamble(identity)) => identity,
            _ => return SessionReport::new(SessionOutcome::MissingPreamble, 0, None),
        },
        Ok(None) => return SessionReport::new(SessionOutcome::MissingPreamble, 0, None),
        Err(e) => {
            debug!("read failed before the preamble: {e}");
            return SessionReport::new(SessionOutcome::ReadFailure, 0, None);
        }
    };
    debug!("session preamble from {identity}");

    let mut words_seen = 0usize;
    let mut have_end_of_stream = false;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_line(&line) {
                Some(ProtocolLine::Word(_)) => words_seen += 1,
                Some(ProtocolLine::EndOfStream) => {
                    have_end_of_stream = true;
                    break;
                }
                _ => {}
            },
            Ok(None) => break,
            Err(e) => {
                debug!("read failed after {words_seen} words: {e}");
                return SessionReport::new(
                    SessionOutcome::ReadFailure,
                    words_seen,
                    Some(identity),
                );
            }
        }
    }

    let outcome = if !have_end_of_stream {
        SessionOutcome::MissingEndOfStream
    } else if words_seen != WORDS_PER_SESSION {
        SessionOutcome::WrongWordCount
    } else {
        SessionOutcome::Connected
    };
    SessionReport::new(outcome, words_seen, Some(identity))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    /// A transcript with the given number of word lines.
    fn transcript(words: usize, end_marker: bool) -> Vec<u8> {
        let mut text = String::from("You are connected to worker 1\n");
        for i in 0..words {
            text.push_str(&format!("WORD: word{i}\n"));
        }
        if end_marker {
            text.push_str("END OF STREAM\n");
        }
        text.into_bytes()
    }

    async fn validate_bytes(bytes: Vec<u8>) -> SessionReport {
        validate_stream(BufReader::new(bytes.as_slice())).await
    }

    #[tokio::test]
    async fn test_well_formed_session_is_connected() {
        let report = validate_bytes(transcript(10, true)).await;
        assert_eq!(report.outcome, SessionOutcome::Connected);
        assert_eq!(report.words_seen, 10);
        assert_eq!(report.server_identity.as_deref(), Some("worker 1"));
    }

    #[tokio::test]
    async fn test_empty_input_is_missing_preamble() {
        let report = validate_bytes(Vec::new()).await;
        assert_eq!(report.outcome, SessionOutcome::MissingPreamble);
        assert_eq!(report.server_identity, None);
    }

    #[tokio::test]
    async fn test_garbled_first_line_is_missing_preamble() {
        let report = validate_bytes(b"hello, who is this?\n".to_vec()).await;
        assert_eq!(report.outcome, SessionOutcome::MissingPreamble);
    }

    #[tokio::test]
    async fn test_word_line_first_is_missing_preamble() {
        // Even a valid protocol line in the wrong position fails the shape
        // check; the preamble must come first.
        let report = validate_bytes(b"WORD: kestrel\n".to_vec()).await;
        assert_eq!(report.outcome, SessionOutcome::MissingPreamble);
    }

    #[tokio::test]
    async fn test_eof_before_end_marker_is_missing_end_of_stream() {
        let report = validate_bytes(transcript(3, false)).await;
        assert_eq!(report.outcome, SessionOutcome::MissingEndOfStream);
        assert_eq!(report.words_seen, 3);
    }

    #[tokio::test]
    async fn test_nine_words_is_wrong_word_count() {
        let report = validate_bytes(transcript(9, true)).await;
        assert_eq!(report.outcome, SessionOutcome::WrongWordCount);
        assert_eq!(report.words_seen, 9);
    }

    #[tokio::test]
    async fn test_eleven_words_is_wrong_word_count() {
        let report = validate_bytes(transcript(11, true)).await;
        assert_eq!(report.outcome, SessionOutcome::WrongWordCount);
        assert_eq!(report.words_seen, 11);
    }

    #[tokio::test]
    async fn test_end_marker_with_no_words_is_wrong_word_count() {
        let report = validate_bytes(transcript(0, true)).await;
        assert_eq!(report.outcome, SessionOutcome::WrongWordCount);
        assert_eq!(report.words_seen, 0);
    }

    #[tokio::test]
    async fn test_unrecognized_lines_are_ignored() {
        let mut bytes = b"You are connected to worker 2\n### noise ###\n".to_vec();
        for i in 0..10 {
            bytes.extend_from_slice(format!("WORD: word{i}\n\n").as_bytes());
        }
        bytes.extend_from_slice(b"END OF STREAM\n");

        let report = validate_bytes(bytes).await;
        assert_eq!(report.outcome, SessionOutcome::Connected);
        assert_eq!(report.words_seen, 10);
    }

    #[tokio::test]
    async fn test_reading_stops_at_the_end_marker() {
        // Anything after the end marker belongs to no session and must not
        // disturb the count.
        let mut bytes = transcript(10, true);
        bytes.extend_from_slice(b"WORD: stray\nWORD: stray\n");

        let report = validate_bytes(bytes).await;
        assert_eq!(report.outcome, SessionOutcome::Connected);
        assert_eq!(report.words_seen, 10);
    }

    #[tokio::test]
    async fn test_second_preamble_is_not_counted_as_a_word() {
        let mut bytes = b"You are connected to worker 1\n".to_vec();
        bytes.extend_from_slice(b"You are connected to worker 9\n");
        for i in 0..10 {
            bytes.extend_from_slice(format!("WORD: word{i}\n").as_bytes());
        }
        bytes.extend_from_slice(b"END OF STREAM\n");

        let report = validate_bytes(bytes).await;
        assert_eq!(report.outcome, SessionOutcome::Connected);
        assert_eq!(report.server_identity.as_deref(), Some("worker 1"));
    }

    #[tokio::test]
    async fn test_read_error_before_preamble_is_read_failure() {
        let reader = tokio_test::io::Builder::new()
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset by peer",
            ))
            .build();
        let report = validate_stream(BufReader::new(reader)).await;
        assert_eq!(report.outcome, SessionOutcome::ReadFailure);
        assert_eq!(report.server_identity, None);
    }

    #[tokio::test]
    async fn test_read_error_mid_session_is_read_failure() {
        let reader = tokio_test::io::Builder::new()
            .read(b"You are connected to worker 4\nWORD: kestrel\nWORD: umber\n")
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset by peer",
            ))
            .build();
        let report = validate_stream(BufReader::new(reader)).await;
        assert_eq!(report.outcome, SessionOutcome::ReadFailure);
        assert_eq!(report.words_seen, 2);
        assert_eq!(report.server_identity.as_deref(), Some("worker 4"));
    }
}
