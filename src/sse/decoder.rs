//! Incremental frame decoder for the agent chat byte stream.
//!
//! The response body arrives as arbitrary byte chunks with no alignment to
//! text or record boundaries. The decoder reassembles UTF-8 text across
//! chunk boundaries, splits it into newline-terminated records, and yields
//! events for the records it recognizes. Everything else (blank keep-alive
//! lines, malformed JSON, unrecognized payload shapes) is skipped without
//! error.

use super::events::StreamEvent;
use super::payloads::FramePayload;

/// Record prefix that marks a recognized event line.
const DATA_PREFIX: &str = "data: ";

/// Stateful decoder turning an ordered byte stream into an ordered sequence
/// of [`StreamEvent`]s.
///
/// One decoder instance owns the buffered state of exactly one stream; it
/// must never be shared between two concurrent streams. Invariant: at any
/// point, `pending` plus all text decoded from future chunks reproduces the
/// unconsumed suffix of the true stream.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Trailing bytes that do not yet form a complete UTF-8 sequence
    carry: Vec<u8>,
    /// Decoded text not yet terminated by a newline
    pending: String,
}

impl FrameDecoder {
    /// Create a new decoder with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning every event completed by it, in
    /// the order the lines were completed.
    ///
    /// A chunk may complete zero, one, or several records; partial records
    /// and partial UTF-8 sequences are buffered until more bytes arrive.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.decode_bytes(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            let line = line.trim_end_matches('\n').trim_end_matches('\r');
            events.extend(parse_frame_line(line));
        }
        events
    }

    /// Flush the final record if the stream ended without a trailing
    /// newline.
    ///
    /// A well-formed unterminated record yields its events; anything else is
    /// discarded silently. A truncated final record is data loss rather than
    /// an error because the server terminates every stream with a `done`
    /// record.
    pub fn close(self) -> Vec<StreamEvent> {
        // An incomplete trailing UTF-8 sequence in `carry` is truncation;
        // only the decoded text can still hold a complete record.
        if self.pending.is_empty() {
            return Vec::new();
        }
        parse_frame_line(self.pending.trim_end_matches('\r'))
    }

    /// Decoded text that has not yet been terminated by a newline.
    pub fn pending_text(&self) -> &str {
        &self.pending
    }

    /// Append chunk bytes to the carried remainder and move every decodable
    /// prefix into the pending text.
    ///
    /// Runs the same non-fatal policy as an incremental text decoder: an
    /// incomplete sequence at the end of the buffer waits for the next
    /// chunk, while a genuinely invalid sequence becomes U+FFFD and decoding
    /// continues.
    fn decode_bytes(&mut self, chunk: &[u8]) {
        self.carry.extend_from_slice(chunk);
        let bytes = std::mem::take(&mut self.carry);
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.pending.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.pending.push_str(text);
                    }
                    match err.error_len() {
                        // Invalid sequence: substitute and keep decoding.
                        Some(len) => {
                            self.pending.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete trailing sequence: keep it for the
                        // next chunk.
                        None => {
                            self.carry = after.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Parse one complete line into its events.
///
/// Lines without the `data: ` prefix, with invalid JSON, or with an
/// unrecognized payload shape are expected stream noise and yield nothing.
/// A payload carrying both a delta and the completion marker yields both
/// events, delta first.
pub fn parse_frame_line(line: &str) -> Vec<StreamEvent> {
    let payload = match line.strip_prefix(DATA_PREFIX) {
        Some(payload) => payload,
        None => return Vec::new(),
    };
    let payload: FramePayload = match serde_json::from_str(payload) {
        Ok(payload) => payload,
        Err(_) => return Vec::new(),
    };

    let mut events = Vec::new();
    if let Some(text) = payload.text {
        events.push(StreamEvent::Delta { text });
    }
    if payload.done == Some(true) {
        if let Some(conversation_id) = payload.conversation_id {
            events.push(StreamEvent::Done { conversation_id });
        }
    }
    events
}
