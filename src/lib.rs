//! Client core for the Gamma ML platform.
//!
//! Two pieces do the real work: the incremental frame decoder in [`sse`],
//! which turns raw response bytes into chat stream events regardless of how
//! the transport chunks them, and the [`session::ChatController`], which
//! owns one conversation's state and drives the send/stream/commit cycle.
//! [`client::GammaClient`] wires both to the backend's agent endpoints over
//! a pluggable [`traits::HttpClient`] transport.
//!
//! ```ignore
//! use std::sync::Arc;
//! use gamma_client::prelude::*;
//!
//! let client = Arc::new(GammaClient::new(ClientConfig::from_env()));
//! let mut session = ChatController::new(client, "project-1", None);
//!
//! session.send("Why did my training job fail?");
//! while let Some(update) = session.next_update().await {
//!     session.apply(update);
//!     if session.phase() == SessionPhase::Idle {
//!         break;
//!     }
//! }
//! ```

pub mod adapters;
pub mod client;
pub mod config;
pub mod models;
pub mod prelude;
pub mod session;
pub mod sse;
pub mod traits;
