//! Trait abstractions for dependency injection.
//!
//! The API client talks to the backend through the [`HttpClient`] trait so
//! the stream consumer and the session controller can be exercised in tests
//! against scripted transports instead of a live server.

mod http;

pub use http::{ByteStream, HttpClient, HttpError, HttpResponse};
