//! Session coordination core for the Lumen client.
//!
//! This crate owns everything between "a request was built" and "a response
//! (or classified error) came back": credential storage and validity, bearer
//! header attachment, 401 detection, and the single-flight refresh protocol
//! that recovers from token expiry without losing or duplicating in-flight
//! requests.
//!
//! External concerns (the actual HTTP transport, durable storage, the auth
//! endpoints, clocks, and the cross-tab signal bus) are ports: traits
//! implemented by adapters in `lumen-infrastructure` or by test doubles.

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod ports;

pub use auth::{CancellationToken, RefreshCoordinator, RequestAuthenticator, TokenStore};
pub use classify::{classify_response, classify_transport, Classification};
pub use client::SessionClient;
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
