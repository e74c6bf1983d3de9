//! Agent chat stream decoding.
//!
//! The Gamma backend streams chat completions as newline-terminated records
//! over a chunked HTTP response. Recognized records are lines of the form
//! `data: <json>` where the JSON is either an incremental text delta or the
//! terminal completion marker carrying the conversation id. Chunk boundaries
//! carry no alignment guarantees: they can fall inside the `data: ` prefix,
//! inside the JSON payload, or inside a multi-byte UTF-8 character.
//!
//! # Module structure
//! - `events` - Event type definitions (StreamEvent enum)
//! - `payloads` - Internal payload deserialization structs
//! - `decoder` - Decoding logic (FrameDecoder, parse_frame_line)

mod decoder;
mod events;
mod payloads;

// Re-export public types
pub use decoder::{parse_frame_line, FrameDecoder};
pub use events::StreamEvent;
