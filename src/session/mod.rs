//! Chat session state management.
//!
//! The [`ChatController`] owns one conversation's state: the message list,
//! the current exchange phase, and the in-flight streaming buffer. Sending
//! a message spawns a stream task that pulls decoded events and forwards
//! them as [`SessionUpdate`]s over an unbounded channel; the caller pumps
//! updates back into [`ChatController::apply`], which is the only place
//! session state mutates. This keeps the state machine synchronous and
//! directly testable while the I/O stays on spawned tasks.
//!
//! # Module structure
//! - `controller` - ChatController and SessionPhase
//! - `updates` - SessionUpdate variants carried over the channel
//! - `error` - StreamError surfaced on a failed exchange

mod controller;
mod error;
mod updates;

pub use controller::{ChatController, SessionPhase};
pub use error::StreamError;
pub use updates::SessionUpdate;
