//! Trait implementations (adapters).
//!
//! Production adapters wire the [`crate::traits`] abstractions to real
//! transports; the `mock` module provides scripted stand-ins for tests.

pub mod mock;
mod reqwest_http;

pub use reqwest_http::ReqwestHttpClient;
